//! TOML-based configuration for ga4-reports.
//!
//! Supports a config file (ga4.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [property]
//! id = "${GOOGLE_ANALYTICS_PROPERTY}"
//!
//! [auth]
//! credentials_path = "~/keys/analytics-reader.json"
//! access_token = "${GA4_ACCESS_TOKEN}"
//!
//! [service]
//! timeout_seconds = 30
//!
//! [reports]
//! channel_dimension = "sessionPrimaryChannelGroup"
//! default_limit = 5000
//!
//! [templates.landing_pages]
//! dimensions = ["date", "landingPage"]
//! metrics = ["sessions", "engagementRate"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::registry::{ReportConfigRegistry, ReportTemplate, DEFAULT_CHANNEL_DIMENSION};
use crate::request::DEFAULT_LIMIT;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GA4_REPORTS_CONFIG";

/// Property id fallback.
pub const PROPERTY_ENV: &str = "GOOGLE_ANALYTICS_PROPERTY";

/// Service account key path fallback.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Access token fallback.
pub const TOKEN_ENV: &str = "GA4_ACCESS_TOKEN";

/// Channel grouping dimension fallback.
pub const CHANNEL_ENV: &str = "SESSION_PERFORMANCE_MARKETING_CHANNELS";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub property: PropertySettings,
    pub auth: AuthSettings,
    pub service: ServiceSettings,
    pub reports: ReportSettings,

    /// Extra templates, registered after the built-ins.
    pub templates: BTreeMap<String, TemplateSettings>,
}

/// Which property to query.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PropertySettings {
    /// Property id, `"123"` or `"properties/123"`.
    pub id: Option<String>,
}

/// Credentials.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Service account key file.
    pub credentials_path: Option<String>,

    /// Pre-minted OAuth access token.
    pub access_token: Option<String>,
}

/// Transport settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Report defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Channel grouping dimension used by the built-in templates.
    pub channel_dimension: Option<String>,

    /// Row limit applied when a command does not give one.
    pub default_limit: u64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            channel_dimension: None,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

/// A template declared in the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateSettings {
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse settings from TOML text, expanding environment variables and
    /// validating the result.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = toml::from_str(content)?;
        settings.expand()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `GA4_REPORTS_CONFIG`
    /// 2. `./ga4.toml`
    /// 3. `~/.config/ga4-reports/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("ga4.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("ga4-reports").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn expand(&mut self) -> Result<(), SettingsError> {
        let fields = [
            &mut self.property.id,
            &mut self.auth.credentials_path,
            &mut self.auth.access_token,
            &mut self.reports.channel_dimension,
        ];
        for value in fields.into_iter().flatten() {
            *value = expand_env_vars(value)?;
        }
        self.service.endpoint = expand_env_vars(&self.service.endpoint)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.service.timeout_seconds == 0 {
            return Err(SettingsError::InvalidConfig(
                "service.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.reports.default_limit == 0 {
            return Err(SettingsError::InvalidConfig(
                "reports.default_limit must be greater than 0".to_string(),
            ));
        }
        for (name, template) in &self.templates {
            if template.dimensions.is_empty() && template.metrics.is_empty() {
                return Err(SettingsError::InvalidConfig(format!(
                    "template '{name}' has no dimensions or metrics"
                )));
            }
        }
        Ok(())
    }

    /// Property id from the file, else `GOOGLE_ANALYTICS_PROPERTY`.
    pub fn property_id(&self) -> Option<String> {
        non_empty(self.property.id.clone()).or_else(|| env_value(PROPERTY_ENV))
    }

    /// Key file path from the file, else `GOOGLE_APPLICATION_CREDENTIALS`.
    ///
    /// A leading `~/` is resolved against the home directory.
    pub fn credentials_path(&self) -> Option<PathBuf> {
        let raw = non_empty(self.auth.credentials_path.clone())
            .or_else(|| env_value(CREDENTIALS_ENV))?;
        match (raw.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => Some(home.join(rest)),
            _ => Some(PathBuf::from(raw.as_str())),
        }
    }

    /// Access token from the file, else `GA4_ACCESS_TOKEN`.
    pub fn access_token(&self) -> Option<String> {
        non_empty(self.auth.access_token.clone()).or_else(|| env_value(TOKEN_ENV))
    }

    /// Channel grouping dimension for the built-in templates.
    pub fn channel_dimension(&self) -> String {
        non_empty(self.reports.channel_dimension.clone())
            .or_else(|| env_value(CHANNEL_ENV))
            .unwrap_or_else(|| DEFAULT_CHANNEL_DIMENSION.to_string())
    }

    /// Templates declared in the file.
    pub fn configured_templates(&self) -> Vec<ReportTemplate> {
        self.templates
            .iter()
            .map(|(name, t)| ReportTemplate::new(name, &t.dimensions, &t.metrics))
            .collect()
    }

    /// Built-in templates followed by configured ones; a configured template
    /// replaces a built-in of the same name.
    pub fn registry(&self) -> ReportConfigRegistry {
        let registry = ReportConfigRegistry::with_builtin_templates(&self.channel_dimension());
        for template in self.configured_templates() {
            registry.insert(template);
        }
        registry
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_value(name: &str) -> Option<String> {
    non_empty(env::var(name).ok())
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            name
        };

        if var_name.is_empty() {
            // Lone $
            result.push('$');
            continue;
        }
        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
