use serde::Serialize;
use thiserror::Error;

/// A 4xx answer from a data provider, kept structured so callers can decide
/// whether a retry with different parameters makes sense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRejection {
    pub message: String,
    pub code: Option<String>,
    pub status: u16,
    pub invalid_ticker: Option<String>,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    NotConfigured(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    Gateway(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{}", .0.message)]
    Rejected(ProviderRejection),
}

impl DomainError {
    /// HTTP status this error surfaces as.
    pub fn status(&self) -> u16 {
        match self {
            DomainError::InvalidInput(_) | DomainError::Rejected(_) => 400,
            DomainError::Unauthorized(_) => 401,
            DomainError::NotFound(_) => 404,
            DomainError::NotConfigured(_) | DomainError::Internal(_) => 500,
            DomainError::Gateway(_) => 502,
            DomainError::Unavailable(_) => 503,
            DomainError::Upstream { status, .. } => *status,
        }
    }

    pub fn rejection(&self) -> Option<&ProviderRejection> {
        match self {
            DomainError::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

impl From<String> for DomainError {
    fn from(s: String) -> Self {
        DomainError::InvalidInput(s)
    }
}

impl From<&str> for DomainError {
    fn from(s: &str) -> Self {
        DomainError::InvalidInput(s.to_string())
    }
}
