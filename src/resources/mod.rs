//! Typed operations per remote resource.
//!
//! Each client maps typed input to typed output through [`ApiClient`]; no
//! caching happens here. Register, login and AI suggestions are anonymous,
//! everything else carries the bearer token.
//!
//! [`ApiClient`]: crate::infra::http::ApiClient

mod ai;
mod auth;
mod comments;
mod groceries;
mod posts;
mod recipes;
mod users;

pub use ai::AiApi;
pub use auth::AuthApi;
pub use comments::CommentsApi;
pub use groceries::GroceriesApi;
pub use posts::PostsApi;
pub use recipes::RecipesApi;
pub use users::UsersApi;

use foodable_api_types::Id;

use crate::infra::http::ApiError;

/// Reject ids the server can never have assigned.
pub(crate) fn require_id(kind: &'static str, id: Id) -> Result<Id, ApiError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ApiError::precondition(format!("invalid {kind} id {id}")))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use httpmock::MockServer;

    use crate::infra::http::ApiClient;
    use crate::infra::token_store::MemoryTokenStore;

    pub(crate) const TOKEN: &str = "test-token";

    pub(crate) fn signed_in(server: &MockServer) -> ApiClient {
        ApiClient::new(
            &server.base_url(),
            Duration::from_secs(5),
            Arc::new(MemoryTokenStore::with_token(TOKEN)),
        )
        .expect("api client")
    }

    pub(crate) fn signed_out(server: &MockServer) -> ApiClient {
        ApiClient::new(
            &server.base_url(),
            Duration::from_secs(5),
            Arc::new(MemoryTokenStore::default()),
        )
        .expect("api client")
    }
}
