//! Request wrapper for the remote Foodable API.

mod client;
mod error;

pub use client::{ApiClient, Auth, json_body};
pub use error::ApiError;
pub use reqwest::Method;
