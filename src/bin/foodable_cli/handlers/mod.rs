pub mod ai;
pub mod auth;
pub mod comments;
pub mod groceries;
pub mod posts;
pub mod recipes;
pub mod saved;
pub mod users;
