//! Query-service error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for query-service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can occur while talking to the query service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Service account key file does not exist.
    #[error("Service account key file not found: {}", .0.display())]
    CredentialsNotFound(PathBuf),

    /// Service account key file could not be used.
    #[error("Invalid credentials file: {0}")]
    InvalidCredentials(String),

    /// No property id was configured.
    #[error("no property configured (set property.id or GOOGLE_ANALYTICS_PROPERTY)")]
    MissingProperty,

    /// No access token was configured or supplied.
    #[error("no access token available (set auth.access_token or GA4_ACCESS_TOKEN)")]
    MissingToken,

    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Request could not be sent or its body not read.
    #[error("failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    /// Request timed out waiting for a response.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Response body did not decode.
    #[error("failed to deserialize response: {0}")]
    DeserializeFailed(String),

    /// The access token was rejected.
    #[error("authentication failed: {0}")]
    Unauthenticated(String),

    /// The credentials lack access to the property.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The service rejected the request (unknown field, bad filter, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Property quota is used up.
    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),

    /// Any other error status from the service.
    #[error("service error: {message} (status: {status}, code: {code})")]
    Api {
        /// HTTP status code.
        code: u16,
        /// Canonical status name, e.g. `INTERNAL`.
        status: String,
        /// Error message from the service.
        message: String,
    },
}

impl ServiceError {
    /// Create an API error from an error response.
    pub fn api(code: u16, status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            status: status.into(),
            message: message.into(),
        }
    }

    /// Classify an error response into a more specific error type.
    pub fn classify(code: u16, status: &str, message: &str) -> Self {
        match status {
            "UNAUTHENTICATED" => Self::Unauthenticated(message.to_string()),
            "PERMISSION_DENIED" => Self::PermissionDenied(message.to_string()),
            "INVALID_ARGUMENT" => Self::InvalidArgument(message.to_string()),
            "RESOURCE_EXHAUSTED" => Self::QuotaExhausted(message.to_string()),
            _ => match code {
                401 => Self::Unauthenticated(message.to_string()),
                403 => Self::PermissionDenied(message.to_string()),
                400 => Self::InvalidArgument(message.to_string()),
                429 => Self::QuotaExhausted(message.to_string()),
                _ => Self::api(code, status, message),
            },
        }
    }

    /// Check if this error is a credentials problem.
    pub fn is_credentials(&self) -> bool {
        matches!(
            self,
            Self::CredentialsNotFound(_)
                | Self::InvalidCredentials(_)
                | Self::MissingToken
                | Self::Unauthenticated(_)
        )
    }

    /// Check if retrying the same request could succeed.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Transport(_) | Self::QuotaExhausted(_) => true,
            Self::Api { code, .. } => *code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::DeserializeFailed(err.to_string())
    }
}
