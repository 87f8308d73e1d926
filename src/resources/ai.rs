use foodable_api_types::{SuggestRequest, SuggestResponse};
use tokio_util::sync::CancellationToken;

use crate::infra::http::{ApiClient, ApiError, Auth, Method, json_body};

#[derive(Clone, Debug)]
pub struct AiApi {
    client: ApiClient,
}

impl AiApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Meal suggestions for a free-text query. Yields `ApiError::Aborted` if
    /// `cancel` fires first.
    pub async fn suggest(
        &self,
        request: &SuggestRequest,
        cancel: &CancellationToken,
    ) -> Result<SuggestResponse, ApiError> {
        self.client
            .request_cancellable(
                Method::POST,
                "/ai/suggest",
                Some(json_body(request)?),
                Auth::Anonymous,
                cancel,
            )
            .await
    }
}
