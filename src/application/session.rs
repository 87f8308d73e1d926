//! Session lifecycle.
//!
//! Signing in replaces the stored token and refreshes everything derived from
//! it. Signing out drops the token and the whole cache so nothing from the
//! previous account survives.

use foodable_api_types::{LoginRequest, RegisterRequest, TokenResponse, UserPublic};
use tracing::{info, warn};

use crate::cache::Resource;

use super::Foodable;
use super::error::AppError;

impl Foodable {
    pub async fn is_authenticated(&self) -> bool {
        match self.tokens.load().await {
            Ok(token) => token.is_some(),
            Err(err) => {
                warn!(error = %err, "Access token unreadable; treating session as signed out");
                false
            }
        }
    }

    /// Create an account, then sign in with the same credentials.
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserPublic, AppError> {
        validate_credentials(&request.email, &request.password)?;
        let user = self.auth.register(request).await?;
        info!(user_id = user.id, "Account registered");

        self.login(&LoginRequest {
            email: request.email.clone(),
            password: request.password.clone(),
        })
        .await?;
        Ok(user)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AppError> {
        validate_credentials(&request.email, &request.password)?;
        let token = self.auth.login(request).await?;
        if !token.token_type.eq_ignore_ascii_case("bearer") {
            warn!(token_type = %token.token_type, "Unexpected token type; sending as bearer");
        }

        self.tokens.save(&token.access_token).await?;
        let invalidated = self.queries.invalidate(&[Resource::Session.into()]);
        info!(invalidated = invalidated.len(), "Signed in");
        Ok(token)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.tokens.clear().await?;
        self.queries.clear();
        info!("Signed out");
        Ok(())
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if !email.contains('@') {
        return Err(AppError::validation("email must contain `@`"));
    }
    if password.is_empty() {
        return Err(AppError::validation("password must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httpmock::MockServer;

    use super::*;
    use crate::cache::QueryKey;
    use crate::config::Settings;
    use crate::infra::token_store::{MemoryTokenStore, TokenStore};

    fn foodable(server: &MockServer, tokens: Arc<MemoryTokenStore>) -> Foodable {
        let settings = Settings::for_api(&server.base_url()).expect("settings");
        Foodable::with_token_store(&settings, tokens).expect("foodable")
    }

    #[tokio::test]
    async fn register_signs_in() -> Result<(), AppError> {
        let server = MockServer::start();
        let register = server.mock(|when, then| {
            when.method("POST")
                .path("/auth/register")
                .json_body_includes(r#"{"email":"new@example.com","name":"New"}"#);
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":12,"email":"new@example.com","name":"New"}"#);
        });
        let login = server.mock(|when, then| {
            when.method("POST").path("/auth/login");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"fresh","token_type":"bearer"}"#);
        });
        let tokens = Arc::new(MemoryTokenStore::default());
        let app = foodable(&server, Arc::clone(&tokens));

        let user = app
            .register(&RegisterRequest {
                email: "new@example.com".into(),
                password: "secret".into(),
                name: Some("New".into()),
            })
            .await?;

        assert_eq!(user.id, 12);
        assert_eq!(tokens.load().await?.as_deref(), Some("fresh"));
        assert!(app.is_authenticated().await);
        register.assert();
        login.assert();
        Ok(())
    }

    #[tokio::test]
    async fn failed_login_keeps_previous_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/auth/login");
            then.status(401).body(r#"{"detail":"Incorrect email or password"}"#);
        });
        let tokens = Arc::new(MemoryTokenStore::with_token("old"));
        let app = foodable(&server, Arc::clone(&tokens));

        let err = app
            .login(&LoginRequest {
                email: "cook@example.com".into(),
                password: "wrong".into(),
            })
            .await
            .expect_err("unauthorized");

        assert!(matches!(err, AppError::Api(ref api) if api.is_unauthorized()));
        assert_eq!(tokens.load().await.expect("load").as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn logout_clears_token_and_cache() -> Result<(), AppError> {
        let server = MockServer::start();
        let app = foodable(&server, Arc::new(MemoryTokenStore::with_token("t")));
        app.queries().store().write(QueryKey::Groceries, 1_u32);

        app.logout().await?;

        assert!(!app.is_authenticated().await);
        assert!(app.queries().store().is_empty());
        Ok(())
    }

    #[test]
    fn credentials_are_checked_locally() {
        assert!(validate_credentials("no-at-sign", "pw").is_err());
        assert!(validate_credentials("a@b.c", "").is_err());
        assert!(validate_credentials("a@b.c", "pw").is_ok());
    }
}
