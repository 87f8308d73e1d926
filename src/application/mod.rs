//! Application layer: the [`Foodable`] facade binding resource clients to the
//! query cache, plus session handling, saved recipes and debounced
//! suggestions.

pub mod error;
mod foodable;
mod saved;
mod session;
pub mod suggest;

pub use foodable::Foodable;
pub use suggest::{SuggestSession, SuggestSource, SuggestState};
