//! Configuration for the contract client
//!
//! One configuration describes one run: every scenario targets the same
//! service instance through a client built from it.

use http::HeaderMap;
use std::time::Duration;

use crate::DEFAULT_BASE_URL;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the contract client.
#[derive(Debug, Clone)]
pub struct ContractConfig {
    /// Base URL of the service, including the `/api/v3` prefix
    pub base_url: Option<String>,

    /// Timeout applied to every request
    pub timeout: Duration,

    /// Timeout for establishing a connection
    pub connect_timeout: Duration,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            default_headers: HeaderMap::new(),
        }
    }
}

impl ContractConfig {
    /// Create a configuration targeting `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    /// The configured base URL, or [`DEFAULT_BASE_URL`].
    pub fn resolved_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first, if present.
    /// This will look for:
    /// - `PETSTORE_BASE_URL` for the service base URL
    /// - `PETSTORE_TIMEOUT` for the request timeout (in seconds)
    /// - `PETSTORE_CONNECT_TIMEOUT` for the connection timeout (in seconds)
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingConfig` if a timeout variable is set but is not a
    /// whole number of seconds.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, crate::error::Error> {
        use std::env;

        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(base_url) = env::var("PETSTORE_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config.base_url = Some(base_url);
        }

        if let Ok(timeout) = env::var("PETSTORE_TIMEOUT") {
            config.timeout = parse_seconds("PETSTORE_TIMEOUT", &timeout)?;
        }

        if let Ok(connect_timeout) = env::var("PETSTORE_CONNECT_TIMEOUT") {
            config.connect_timeout = parse_seconds("PETSTORE_CONNECT_TIMEOUT", &connect_timeout)?;
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence.
    pub fn merge(mut self, other: ContractConfig) -> Self {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.timeout != DEFAULT_TIMEOUT {
            self.timeout = other.timeout;
        }
        if other.connect_timeout != DEFAULT_CONNECT_TIMEOUT {
            self.connect_timeout = other.connect_timeout;
        }
        for (key, value) in other.default_headers.iter() {
            self.default_headers.insert(key.clone(), value.clone());
        }

        self
    }
}

#[cfg(feature = "env")]
fn parse_seconds(var: &str, value: &str) -> Result<Duration, crate::error::Error> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| {
            crate::error::Error::MissingConfig(format!(
                "{var} must be a whole number of seconds, got `{value}`"
            ))
        })
}

/// Builder for creating ContractConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ContractConfigBuilder {
    config: ContractConfig,
}

impl ContractConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is not valid HTTP.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> crate::Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| crate::Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| crate::Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the configuration.
    pub fn build(self) -> ContractConfig {
        self.config
    }
}
