//! Request and response records for the Foodable REST API.
//!
//! Field names follow the wire format (snake_case JSON). Records are shared by
//! the resource clients in `foodable` and by the command-line client.

pub mod ai;
pub mod auth;
pub mod community;
pub mod groceries;
pub mod recipes;
pub mod timestamp;

pub use ai::{SuggestRequest, SuggestResponse, Suggestion};
pub use auth::{LoginRequest, RegisterRequest, TokenResponse, UserPublic};
pub use community::{
    Comment, LikeToggle, NewComment, NewPost, Post, PostDetail, PostKind, UserProfile, UserStats,
};
pub use groceries::{Grocery, NewGrocery};
pub use recipes::{NewRecipe, Recipe};

/// Server-assigned identifier used by every resource.
pub type Id = i64;
