use thiserror::Error;

use crate::{config::LoadError, infra::error::InfraError, infra::http::ApiError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error("not signed in")]
    SignedOut,
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Short message suitable for showing to the person using the client.
    pub fn presentation_message(&self) -> &'static str {
        match self {
            AppError::Api(ApiError::Network(_)) => "Could not reach the Foodable service",
            AppError::Api(ApiError::Http { status: 401, .. }) | AppError::SignedOut => {
                "Please sign in to continue"
            }
            AppError::Api(ApiError::Http { status: 403, .. }) => "You are not allowed to do that",
            AppError::Api(ApiError::Http { status: 404, .. }) => "Not found",
            AppError::Api(ApiError::Http { .. }) => "The Foodable service rejected the request",
            AppError::Api(ApiError::Parse(_)) => "Unexpected response from the Foodable service",
            AppError::Api(ApiError::Precondition(_)) | AppError::Validation(_) => {
                "Request could not be sent"
            }
            AppError::Api(ApiError::Aborted) => "Request cancelled",
            AppError::Infra(_) => "Local storage failure",
            AppError::Config(_) => "Client misconfigured",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentation_messages_follow_status() {
        let forbidden = AppError::from(ApiError::Http {
            status: 403,
            body: String::new(),
        });
        assert_eq!(forbidden.presentation_message(), "You are not allowed to do that");
        assert_eq!(
            AppError::SignedOut.presentation_message(),
            "Please sign in to continue"
        );
    }
}
