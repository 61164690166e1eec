//! Configuration module for ga4-reports.
//!
//! Handles the config file, environment variable fallbacks, and the
//! templates a deployment adds to the built-in set.

mod settings;

pub use settings::{
    expand_env_vars, AuthSettings, PropertySettings, ReportSettings, ServiceSettings, Settings,
    SettingsError, TemplateSettings, CHANNEL_ENV, CONFIG_ENV, CREDENTIALS_ENV, PROPERTY_ENV,
    TOKEN_ENV,
};
