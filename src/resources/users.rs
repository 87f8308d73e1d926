use foodable_api_types::{Id, UserProfile};

use crate::infra::http::{ApiClient, ApiError, Auth, Method};

use super::require_id;

#[derive(Clone, Debug)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Public profile: the user, their posts and counters.
    pub async fn profile(&self, user_id: Id) -> Result<UserProfile, ApiError> {
        let user_id = require_id("user", user_id)?;
        self.client
            .request(Method::GET, &format!("/users/{user_id}"), None, Auth::Bearer)
            .await
    }
}
