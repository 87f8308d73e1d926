//! Client-side data layer for the Foodable API.
//!
//! [`application::Foodable`] is the entry point: it owns the query cache,
//! the resource clients and the local stores, and exposes one method per
//! screen-level read or write.

pub mod application;
pub mod cache;
pub mod config;
pub mod infra;
pub mod resources;
pub mod util;
