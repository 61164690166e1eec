//! HTTP client for the analytics data API.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::credentials::ServiceAccountKey;
use super::error::{ServiceError, ServiceResult};
use super::service::{QueryService, StaticToken, TokenSource};
use crate::config::Settings;
use crate::request::ReportRequest;
use crate::response::RunReportResponse;

/// Public endpoint of the analytics data API.
pub const DEFAULT_ENDPOINT: &str = "https://analyticsdata.googleapis.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Client for one analytics property.
#[derive(Clone)]
pub struct Ga4Client {
    http: Client,
    endpoint: String,
    property: String,
    timeout_secs: u64,
    tokens: Arc<dyn TokenSource>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

impl Ga4Client {
    /// Create a client for `property` (`"123"` or `"properties/123"`).
    pub fn new(property: &str, tokens: Arc<dyn TokenSource>) -> ServiceResult<Self> {
        Self::with_options(property, tokens, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client with an explicit endpoint and timeout.
    pub fn with_options(
        property: &str,
        tokens: Arc<dyn TokenSource>,
        endpoint: &str,
        timeout_secs: u64,
    ) -> ServiceResult<Self> {
        let property = normalize_property(property).ok_or(ServiceError::MissingProperty)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ServiceError::ClientBuild)?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            property,
            timeout_secs,
            tokens,
        })
    }

    /// Build a client from loaded settings.
    ///
    /// The service account key file, when configured, is loaded and checked
    /// first so a bad path fails before any request is made.
    pub fn from_settings(settings: &Settings) -> ServiceResult<Self> {
        let property = settings.property_id().ok_or(ServiceError::MissingProperty)?;

        if let Some(path) = settings.credentials_path() {
            let key = ServiceAccountKey::from_file(&path)?;
            tracing::debug!(client_email = %key.client_email, "loaded service account key");
        }

        let token = settings.access_token().ok_or(ServiceError::MissingToken)?;
        Self::with_options(
            &property,
            Arc::new(StaticToken::new(token)),
            &settings.service.endpoint,
            settings.service.timeout_seconds,
        )
    }

    /// Numeric property id.
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL of the runReport method for this property.
    pub fn run_report_url(&self) -> String {
        format!(
            "{}/v1beta/properties/{}:runReport",
            self.endpoint, self.property
        )
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ServiceResult<RunReportResponse> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        decode_response(status, &body)
    }

    fn transport_error(&self, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::Timeout(self.timeout_secs)
        } else {
            ServiceError::Transport(err)
        }
    }
}

/// Decode a runReport reply from its status code and body.
///
/// Error bodies are read as the API's error envelope when possible and
/// classified by status name; anything else is classified by HTTP code with
/// the raw body as the message.
fn decode_response(status: u16, body: &str) -> ServiceResult<RunReportResponse> {
    if (200..300).contains(&status) {
        return Ok(serde_json::from_str(body)?);
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => Err(ServiceError::classify(
            status,
            &envelope.error.status,
            &envelope.error.message,
        )),
        Err(_) => Err(ServiceError::classify(status, "", body.trim())),
    }
}

#[async_trait::async_trait]
impl QueryService for Ga4Client {
    async fn run_report(&self, request: &ReportRequest) -> ServiceResult<RunReportResponse> {
        let token = self.tokens.access_token().await?;
        let url = self.run_report_url();
        tracing::debug!(property = %self.property, %url, "sending runReport request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.handle_response(response).await
    }
}

impl fmt::Debug for Ga4Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ga4Client")
            .field("endpoint", &self.endpoint)
            .field("property", &self.property)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

/// Accept `"123"` or `"properties/123"`; return the bare id.
fn normalize_property(property: &str) -> Option<String> {
    let id = property.trim();
    let id = id.strip_prefix("properties/").unwrap_or(id).trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
