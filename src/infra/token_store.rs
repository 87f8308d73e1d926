//! Access-token persistence.
//!
//! The request wrapper reads the bearer token through [`TokenStore`] on every
//! authenticated call; the session layer writes it on login and clears it on
//! logout.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::cache::mutex_lock;

use super::error::InfraError;

const TOKEN_FILE_NAME: &str = "token";
const SOURCE: &str = "infra::token_store";

#[async_trait]
pub trait TokenStore: Send + Sync + fmt::Debug {
    async fn load(&self) -> Result<Option<String>, InfraError>;
    async fn save(&self, token: &str) -> Result<(), InfraError>;
    async fn clear(&self) -> Result<(), InfraError>;
}

/// Token kept in `<data_dir>/token`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(TOKEN_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, InfraError> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(InfraError::Io(err)),
        }
    }

    async fn save(&self, token: &str) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, token).await?;
        restrict_permissions(&self.path).await?;
        debug!(path = %self.path.display(), "Access token saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), InfraError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Access token removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(InfraError::Io(err)),
        }
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<(), InfraError> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<(), InfraError> {
    Ok(())
}

/// Process-local token, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, InfraError> {
        Ok(mutex_lock(&self.token, SOURCE, "load").clone())
    }

    async fn save(&self, token: &str) -> Result<(), InfraError> {
        *mutex_lock(&self.token, SOURCE, "save") = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), InfraError> {
        *mutex_lock(&self.token, SOURCE, "clear") = None;
        Ok(())
    }
}
