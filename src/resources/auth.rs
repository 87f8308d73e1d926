use foodable_api_types::{LoginRequest, RegisterRequest, TokenResponse, UserPublic};

use crate::infra::http::{ApiClient, ApiError, Auth, Method, json_body};

#[derive(Clone, Debug)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserPublic, ApiError> {
        self.client
            .request(
                Method::POST,
                "/auth/register",
                Some(json_body(request)?),
                Auth::Anonymous,
            )
            .await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.client
            .request(
                Method::POST,
                "/auth/login",
                Some(json_body(request)?),
                Auth::Anonymous,
            )
            .await
    }

    pub async fn me(&self) -> Result<UserPublic, ApiError> {
        self.client
            .request(Method::GET, "/auth/me", None, Auth::Bearer)
            .await
    }
}
