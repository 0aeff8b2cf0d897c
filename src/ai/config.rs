//! Provider configuration
//!
//! The API key and endpoint settings are resolved once, by the caller, and
//! handed to the provider explicitly.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Video requests are large and slow to process; allow plenty of time
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variables checked for the API key, in order
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Settings for the analysis provider
#[derive(Clone)]
pub struct AnalysisConfig {
    /// API key; may be empty, in which case the provider rejects the call
    pub api_key: String,

    /// Base URL for API (default: https://generativelanguage.googleapis.com)
    pub base_url: String,

    /// Model to use (default: gemini-2.5-flash)
    pub model: String,

    pub request_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl AnalysisConfig {
    /// Build a config from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable lookup (the environment, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // A missing key is not an error here; the provider reports it
        config.api_key = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(*name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .unwrap_or_default();

        if let Some(base_url) = non_empty(lookup("GEMINI_BASE_URL")) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(model) = non_empty(lookup("GEMINI_MODEL")) {
            config.model = model;
        }
        if let Some(raw) = non_empty(lookup("GEMINI_TIMEOUT_SECS")) {
            let secs = raw.parse::<u64>().map_err(|_| ConfigError::InvalidTimeout {
                var: "GEMINI_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
