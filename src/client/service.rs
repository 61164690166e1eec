//! Query service and token source traits.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::error::{ServiceError, ServiceResult};
use crate::request::ReportRequest;
use crate::response::RunReportResponse;

/// Something that can execute a report request.
///
/// [`Ga4Client`](super::Ga4Client) talks to the real service; tests and
/// offline tools supply their own implementation.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Execute one report request.
    async fn run_report(&self, request: &ReportRequest) -> ServiceResult<RunReportResponse>;
}

#[async_trait]
impl<T: QueryService + ?Sized> QueryService for Arc<T> {
    async fn run_report(&self, request: &ReportRequest) -> ServiceResult<RunReportResponse> {
        (**self).run_report(request).await
    }
}

/// Supplies bearer tokens for service calls.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Current access token.
    async fn access_token(&self) -> ServiceResult<String>;
}

/// A fixed, externally minted access token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> ServiceResult<String> {
        if self.0.trim().is_empty() {
            return Err(ServiceError::MissingToken);
        }
        Ok(self.0.clone())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(<redacted>)")
    }
}
