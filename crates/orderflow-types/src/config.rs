//! Configuration for the dataset API.

use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the API authentication token.
pub const ENV_TOKEN: &str = "API_TOKEN";

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "API_BASE_URL";

/// Default request timeout for dataset fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while resolving the API configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The authentication token is not configured.
    #[error("{ENV_TOKEN} not configured")]
    MissingToken,

    /// The API base URL is not configured.
    #[error("{ENV_BASE_URL} not configured")]
    MissingBaseUrl,
}

/// Connection settings for the dataset API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the API, without a trailing path.
    pub base_url: String,
    /// Authentication token sent with every request.
    pub token: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Creates a configuration with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves the configuration from the process environment.
    ///
    /// Reads [`ENV_BASE_URL`] and [`ENV_TOKEN`]. An unset or empty variable
    /// is a typed error rather than a broken request later on.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or base URL is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(ENV_TOKEN)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;
        let base_url = lookup(ENV_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        Ok(Self::new(base_url, token))
    }
}
