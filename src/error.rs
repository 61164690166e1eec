//! Error types for report building, dispatch and normalization.
//!
//! Every failure the core can raise lives in [`ReportError`]. Validation
//! errors are raised while a request is assembled, before anything is sent;
//! response errors are raised while a table is normalized. Transport
//! failures from the query service arrive as [`ServiceError`] and are
//! folded into [`ReportError::QueryService`], except local credential
//! failures, which become [`ReportError::Credentials`].

use crate::client::ServiceError;

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors raised by the reporting core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    /// Operator is not valid for the target it was applied to.
    #[error("Unsupported operator '{operator}' for {target}")]
    UnsupportedOperator { operator: String, target: String },

    /// Metric filter value could not be read as a number.
    #[error("Invalid filter value '{value}' for metric '{field}': expected a number")]
    InvalidFilterValue { field: String, value: String },

    /// Filter or ordering text could not be read.
    #[error("Cannot read '{input}': expected {expected}")]
    InvalidText { input: String, expected: String },

    /// A combinator was given no filters.
    #[error("Must provide at least one filter")]
    EmptyInput,

    /// No template registered under this name.
    #[error("Report template '{0}' not found in predefined configurations")]
    UnknownTemplate(String),

    /// Date range is missing, unparseable, or ends before it starts.
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// Request names neither dimensions nor metrics.
    #[error("Report must request at least one dimension or metric")]
    EmptyQuery,

    /// Row limit must be positive.
    #[error("Invalid limit {0}: must be greater than zero")]
    InvalidLimit(u64),

    /// Service-account key or access token is missing or unusable.
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The query service failed; carries the underlying message.
    #[error("Error running report: {0}")]
    QueryService(String),

    /// Response shape does not match its own headers.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A metric value could not be coerced to a number.
    #[error("Cannot convert value '{value}' in metric column '{column}' at row {row} to a number")]
    NumericCoercion {
        column: String,
        row: usize,
        value: String,
    },
}

impl ReportError {
    pub(crate) fn invalid_text(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidText {
            input: input.into(),
            expected: expected.into(),
        }
    }

    pub(crate) fn unsupported_operator(
        operator: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::UnsupportedOperator {
            operator: operator.into(),
            target: target.into(),
        }
    }

    /// Whether the error was raised before any request left the process.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperator { .. }
                | Self::InvalidFilterValue { .. }
                | Self::InvalidText { .. }
                | Self::EmptyInput
                | Self::UnknownTemplate(_)
                | Self::InvalidDateRange(_)
                | Self::EmptyQuery
                | Self::InvalidLimit(_)
        )
    }
}

impl From<ServiceError> for ReportError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::CredentialsNotFound(_)
            | ServiceError::InvalidCredentials(_)
            | ServiceError::MissingToken => Self::Credentials(err.to_string()),
            other => Self::QueryService(other.to_string()),
        }
    }
}
