//! Service account key files.
//!
//! The key file is the JSON document downloaded from the cloud console for
//! a service account. It is loaded and checked here; exchanging it for an
//! access token is left to a [`TokenSource`](super::TokenSource).

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::{ServiceError, ServiceResult};

/// Scope granting read access to analytics data.
pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

/// A parsed service account key.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Load and check a key file.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::CredentialsNotFound`] if the path is not a file.
    /// - [`ServiceError::InvalidCredentials`] if the file is not a service
    ///   account key.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ServiceResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ServiceError::CredentialsNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ServiceError::InvalidCredentials(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse and check a key from its JSON text.
    pub fn from_json(json: &str) -> ServiceResult<Self> {
        let key: ServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| ServiceError::InvalidCredentials(e.to_string()))?;

        if key.key_type != "service_account" {
            return Err(ServiceError::InvalidCredentials(format!(
                "expected key type 'service_account', found '{}'",
                key.key_type
            )));
        }
        if !key.private_key.contains("PRIVATE KEY") {
            return Err(ServiceError::InvalidCredentials(
                "private_key is not a PEM encoded key".to_string(),
            ));
        }
        if key.client_email.trim().is_empty() {
            return Err(ServiceError::InvalidCredentials(
                "client_email is empty".to_string(),
            ));
        }

        Ok(key)
    }
}

// Keeps the private key out of logs.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
