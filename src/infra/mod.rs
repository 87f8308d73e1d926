//! Infrastructure adapters: remote API transport, on-device stores and
//! runtime bootstrap.

pub mod error;
pub mod http;
pub mod saved_recipes;
pub mod telemetry;
pub mod token_store;
