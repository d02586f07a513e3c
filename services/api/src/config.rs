//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub summary_model: String,
    pub summary_timeout: Duration,
    pub max_upload_bytes: usize,
    pub session_idle_timeout: Duration,
    pub cors_allowed_origin: String,
}

// The API key never appears in logs or panic messages.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("log_level", &self.log_level)
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("summary_model", &self.summary_model)
            .field("summary_timeout", &self.summary_timeout)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("session_idle_timeout", &self.session_idle_timeout)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Model Provider (the API key is required at startup) ---
        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;
        let openai_base_url = lookup("OPENAI_BASE_URL").filter(|url| !url.trim().is_empty());
        let summary_model =
            lookup("SUMMARY_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string());
        let summary_timeout = Duration::from_secs(parse_number(&lookup, "SUMMARY_TIMEOUT_SECS", 120)?);

        // --- Session and Upload Limits ---
        let max_upload_bytes = parse_number(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)? as usize;
        let session_idle_timeout = parse_number(&lookup, "SESSION_IDLE_MINUTES", 60)?
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "SESSION_IDLE_MINUTES".to_string(),
                    "value is too large".to_string(),
                )
            })?;

        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN")
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            log_level,
            openai_api_key,
            openai_base_url,
            summary_model,
            summary_timeout,
            max_upload_bytes,
            session_idle_timeout,
            cors_allowed_origin,
        })
    }
}

/// Reads a positive integer variable, falling back to `default` when unset.
fn parse_number<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) => Err(ConfigError::InvalidValue(
                key.to_string(),
                "must be greater than zero".to_string(),
            )),
            Ok(value) => Ok(value),
            Err(e) => Err(ConfigError::InvalidValue(key.to_string(), e.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.summary_model, "gpt-3.5-turbo");
        assert_eq!(config.summary_timeout, Duration::from_secs(120));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(3600));
        assert!(config.openai_base_url.is_none());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingVar(var)) if var == "OPENAI_API_KEY"));

        let blank = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")]));
        assert!(matches!(blank, Err(ConfigError::MissingVar(_))));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("SUMMARY_MODEL", "gpt-4o-mini"),
            ("SUMMARY_TIMEOUT_SECS", "30"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.summary_model, "gpt-4o-mini");
        assert_eq!(config.summary_timeout, Duration::from_secs(30));
        assert_eq!(config.openai_base_url.as_deref(), Some("http://localhost:11434/v1"));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let bad_timeout = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SUMMARY_TIMEOUT_SECS", "soon"),
        ]));
        assert!(matches!(bad_timeout, Err(ConfigError::InvalidValue(var, _)) if var == "SUMMARY_TIMEOUT_SECS"));

        let zero_limit = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MAX_UPLOAD_BYTES", "0"),
        ]));
        assert!(matches!(zero_limit, Err(ConfigError::InvalidValue(_, _))));

        let huge_idle = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SESSION_IDLE_MINUTES", "18446744073709551615"),
        ]));
        assert!(matches!(huge_idle, Err(ConfigError::InvalidValue(var, _)) if var == "SESSION_IDLE_MINUTES"));
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-secret")])).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
    }
}
