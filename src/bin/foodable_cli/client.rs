use foodable::application::error::AppError;
use foodable::config::LoadError;
use foodable::infra::error::InfraError;
use foodable::infra::http::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("{}: {}", .0.presentation_message(), .0)]
    App(#[from] AppError),
    #[error("failed to read input: {0}")]
    Input(std::io::Error),
    #[error("failed to render output: {0}")]
    Output(String),
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::App(AppError::from(err))
    }
}
