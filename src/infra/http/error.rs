use thiserror::Error;

/// Failure of one API call.
///
/// Cloneable so a shared in-flight fetch can hand the same error to every
/// subscriber, and so cache entries can keep the last error next to stale
/// data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure; no response was received.
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response. The body is kept verbatim.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    /// Rejected before any I/O, e.g. missing token or invalid id.
    #[error("precondition failed: {0}")]
    Precondition(String),
    /// Cancelled by the caller. Never surfaced to users.
    #[error("request aborted")]
    Aborted,
}

impl ApiError {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// HTTP status for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_status_and_body() {
        let err = ApiError::Http {
            status: 404,
            body: r#"{"detail":"Post not found"}"#.into(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Post not found"));
        assert_eq!(ApiError::Aborted.status(), None);
    }
}
