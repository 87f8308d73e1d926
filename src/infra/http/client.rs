use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::infra::token_store::TokenStore;

use super::error::ApiError;

/// Whether a call carries the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Bearer,
    Anonymous,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)
            .map_err(|err| ApiError::precondition(format!("invalid API URL `{base_url}`: {err}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(ApiError::from_transport)?;
        Ok(Self {
            client,
            base,
            tokens,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("foodable/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::precondition(format!("invalid request path `{path}`: {err}")))
    }

    /// Send a request and parse the JSON response.
    ///
    /// A 204 or empty body decodes as JSON `null`, so `()` and `Option<T>`
    /// targets receive an explicit empty value.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let (status, bytes) = self.send(method, path, body, auth).await?;
        decode(status, &bytes)
    }

    /// Send a request and discard any response body.
    pub async fn request_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        auth: Auth,
    ) -> Result<(), ApiError> {
        self.send(method, path, body, auth).await.map(|_| ())
    }

    /// Like [`ApiClient::request`], yielding `ApiError::Aborted` as soon as
    /// `cancel` fires.
    pub async fn request_cancellable<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        auth: Auth,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(path, "API request aborted");
                Err(ApiError::Aborted)
            }
            result = self.request(method, path, body, auth) => result,
        }
    }

    async fn bearer_token(&self) -> Result<String, ApiError> {
        match self.tokens.load().await {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(ApiError::precondition("not signed in: no access token stored")),
            Err(err) => Err(ApiError::precondition(format!(
                "access token unavailable: {err}"
            ))),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        auth: Auth,
    ) -> Result<(StatusCode, Bytes), ApiError> {
        let url = self.url(path)?;
        let mut req = self.client.request(method.clone(), url);
        if auth == Auth::Bearer {
            req = req.bearer_auth(self.bearer_token().await?);
        }
        if let Some(b) = body {
            req = req.json(&b);
        }

        debug!(method = %method, path, "Sending API request");
        let resp = req.send().await.map_err(|err| {
            warn!(method = %method, path, error = %err, "API request failed");
            ApiError::from_transport(err)
        })?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(ApiError::from_transport)?;
        debug!(
            method = %method,
            path,
            status = status.as_u16(),
            bytes = bytes.len(),
            "API response received"
        );

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            warn!(
                method = %method,
                path,
                status = status.as_u16(),
                "API request rejected"
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok((status, bytes))
    }
}

/// Serialize a request payload for [`ApiClient::request`].
pub fn json_body<T: Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|err| ApiError::precondition(format!("failed to encode request body: {err}")))
}

fn decode<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T, ApiError> {
    let raw: &[u8] = if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace)
    {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(raw).map_err(|err| ApiError::Parse(format!("failed to parse body: {err}")))
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;
    use crate::infra::token_store::MemoryTokenStore;

    fn client(server: &MockServer, token: Option<&str>) -> ApiClient {
        let tokens = match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::default(),
        };
        ApiClient::new(&server.base_url(), Duration::from_secs(5), Arc::new(tokens)).expect("client")
    }

    #[tokio::test]
    async fn bearer_calls_attach_token() -> Result<(), ApiError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/auth/me")
                .header("authorization", "Bearer tok-1");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":1,"email":"a@b.c","name":null}"#);
        });

        let value: serde_json::Value = client(&server, Some("tok-1"))
            .request(Method::GET, "/auth/me", None, Auth::Bearer)
            .await?;

        assert_eq!(value["email"], "a@b.c");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn missing_token_fails_before_io() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/groceries/");
            then.status(200).body("[]");
        });

        let err = client(&server, None)
            .request::<serde_json::Value>(Method::GET, "/groceries/", None, Auth::Bearer)
            .await
            .expect_err("no token");

        assert!(matches!(err, ApiError::Precondition(_)));
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn no_content_decodes_as_null() -> Result<(), ApiError> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("DELETE").path("/groceries/3");
            then.status(204);
        });

        let api = client(&server, Some("t"));
        api.request::<()>(Method::DELETE, "/groceries/3", None, Auth::Bearer)
            .await?;
        let optional: Option<serde_json::Value> = api
            .request(Method::DELETE, "/groceries/3", None, Auth::Bearer)
            .await?;

        assert!(optional.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn non_success_keeps_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("DELETE").path("/posts/9");
            then.status(403).body(r#"{"detail":"Not the author"}"#);
        });

        let err = client(&server, Some("t"))
            .request_unit(Method::DELETE, "/posts/9", None, Auth::Bearer)
            .await
            .expect_err("forbidden");

        assert_eq!(
            err,
            ApiError::Http {
                status: 403,
                body: r#"{"detail":"Not the author"}"#.into(),
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/auth/login");
            then.status(200).body("<html>oops</html>");
        });

        let err = client(&server, None)
            .request::<serde_json::Value>(
                Method::POST,
                "/auth/login",
                Some(json!({"email": "a@b.c", "password": "pw"})),
                Auth::Anonymous,
            )
            .await
            .expect_err("not json");

        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn cancelled_request_is_aborted() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/ai/suggest");
            then.status(200)
                .delay(Duration::from_secs(2))
                .body(r#"{"original_query":"x","suggestions":[]}"#);
        });

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client(&server, None)
            .request_cancellable::<serde_json::Value>(
                Method::POST,
                "/ai/suggest",
                Some(json!({"query": "x"})),
                Auth::Anonymous,
                &cancel,
            )
            .await
            .expect_err("aborted");

        assert!(err.is_aborted());
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let api = ApiClient::new(
            "http://localhost:8000/api",
            Duration::from_secs(1),
            Arc::new(MemoryTokenStore::default()),
        )
        .expect("client");
        let url = api.url("/posts/4").expect("url");
        assert_eq!(url.as_str(), "http://localhost:8000/api/posts/4");
    }
}
