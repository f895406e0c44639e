//! Client configuration
//!
//! The backend base URL, request timeout, and optional bearer token.
//! Loaded from a TOML fragment or from the environment
//! (`EASEL_BASE_URL`, `EASEL_TIMEOUT_SECS`, `EASEL_TOKEN`).

use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Base URL failed to parse
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// TOML fragment failed to parse
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Timeout value is not a positive integer
    #[error("invalid timeout: {0}")]
    Timeout(String),
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Bearer token sent with every request, if any
    pub bearer_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    base_url: String,
    timeout_secs: Option<u64>,
    token: Option<String>,
}

impl ClientConfig {
    /// Configuration pointing at `base_url` with defaults elsewhere
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bearer_token: None,
        }
    }

    /// Set the request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the bearer token
    #[inline]
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Parse a TOML fragment
    ///
    /// ```toml
    /// base_url = "https://workbench.internal"
    /// timeout_secs = 10
    /// token = "…"
    /// ```
    ///
    /// # Errors
    /// Returns error for malformed TOML or an unparseable base URL
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(input)?;
        let mut config = Self::new(Url::parse(&raw.base_url)?);
        if let Some(secs) = raw.timeout_secs {
            if secs == 0 {
                return Err(ConfigError::Timeout("timeout must be positive".to_string()));
            }
            config.timeout = Duration::from_secs(secs);
        }
        config.bearer_token = raw.token;
        Ok(config)
    }

    /// Read configuration from the environment, with defaults for
    /// anything unset
    ///
    /// # Errors
    /// Returns error if a set variable fails to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = std::env::var("EASEL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(Url::parse(&base)?);
        if let Ok(raw) = std::env::var("EASEL_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ConfigError::Timeout(raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::Timeout(raw));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(token) = std::env::var("EASEL_TOKEN") {
            config.bearer_token = Some(token);
        }
        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        // DEFAULT_BASE_URL is statically valid.
        let base_url = Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!());
        Self::new(base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.bearer_token.is_none());
    }

    #[test]
    fn toml_full_fragment() {
        let config = ClientConfig::from_toml_str(
            r#"
            base_url = "https://workbench.internal"
            timeout_secs = 10
            token = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url.host_str(), Some("workbench.internal"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.bearer_token.as_deref(), Some("secret"));
    }

    #[test]
    fn toml_rejects_zero_timeout() {
        let result = ClientConfig::from_toml_str(
            r#"
            base_url = "https://workbench.internal"
            timeout_secs = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Timeout(_))));
    }

    #[test]
    fn toml_rejects_bad_url() {
        let result = ClientConfig::from_toml_str(r#"base_url = "not a url""#);
        assert!(matches!(result, Err(ConfigError::BaseUrl(_))));
    }
}
