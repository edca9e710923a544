//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Complete client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL including the `/api` prefix
    pub api_url: String,
    /// File the user and admin tokens are persisted in
    pub session_file: PathBuf,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `api_override` - Optional API URL override (from CLI args)
    /// * `session_override` - Optional session file override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if no session file location can be determined
    pub fn from_env(
        api_override: Option<String>,
        session_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let api_url = api_override
            .or_else(|| std::env::var("FLEXINVEST_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim().trim_end_matches('/').to_string();

        let session_file = match session_override
            .or_else(|| std::env::var_os("FLEXINVEST_SESSION_FILE").map(PathBuf::from))
        {
            Some(path) => path,
            None => default_session_file()?,
        };

        Ok(ClientConfig {
            api_url,
            session_file,
            request_timeout_secs: parse_env_or("FLEXINVEST_REQUEST_TIMEOUT_SECS", 30),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "FLEXINVEST_API_URL".to_string(),
                reason: format!("Must start with http:// or https:// (got '{}')", self.api_url),
            });
        }

        if self.session_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "FLEXINVEST_SESSION_FILE".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "FLEXINVEST_REQUEST_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_session_file() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("ng", "flexinvest", "flexinvest")
        .map(|dirs| dirs.data_dir().join("session.json"))
        .ok_or_else(|| ConfigError::MissingRequired {
            var: "FLEXINVEST_SESSION_FILE".to_string(),
            hint: "No home directory found; pass --session PATH".to_string(),
        })
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
