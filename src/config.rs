//! Configuration loading and constants.
//!
//! Defines the fixed values of the blue/green test probe (marker header, timeouts,
//! environment variable names) and the `AppConfig` root struct. Configuration comes
//! from built-in defaults, an optional TOML file, and the process environment, in
//! that order of increasing priority.

use std::path::Path;

use const_format::formatcp;
use serde::Deserialize;

// =============================================================================
// Probe Request Constants
// =============================================================================

/// Environment variable holding the load balancer DNS name
pub const ENDPOINT_ENV_VAR: &str = "ALB_DNS_NAME";

/// Header the load balancer test listener rule matches on to route to the green target group
pub const TEST_HEADER_NAME: &str = "x-amzn-ecs-bluegreen-test";

/// Value of the marker header
pub const TEST_HEADER_VALUE: &str = "test-green";

/// URL scheme used to reach the load balancer
pub const DEFAULT_SCHEME: &str = "https";

/// Path requested on the load balancer
pub const DEFAULT_PATH: &str = "/";

/// TCP connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 2;

/// Read timeout in seconds (applies to each read, resets after progress)
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 5;

/// User-Agent sent with the probe request
pub const USER_AGENT: &str = formatcp!(
    "{}/{}",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_VERSION")
);

// =============================================================================
// Logging Defaults
// =============================================================================

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "bluegreen_hook=info,lambda_runtime=info";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Health-check probe settings
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the single GET issued against the load balancer
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Load balancer hostname. Usually filled from `ALB_DNS_NAME`.
    pub endpoint: Option<String>,
    #[serde(default = "ProbeConfig::default_scheme")]
    pub scheme: String,
    #[serde(default = "ProbeConfig::default_path")]
    pub path: String,
    #[serde(default = "ProbeConfig::default_header_name")]
    pub header_name: String,
    #[serde(default = "ProbeConfig::default_header_value")]
    pub header_value: String,
    #[serde(default = "ProbeConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    #[serde(default = "ProbeConfig::default_read_timeout")]
    pub read_timeout_seconds: u64,
    /// Verify the load balancer's TLS certificate (default: true)
    #[serde(default = "ProbeConfig::default_tls_verify")]
    pub tls_verify: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            scheme: Self::default_scheme(),
            path: Self::default_path(),
            header_name: Self::default_header_name(),
            header_value: Self::default_header_value(),
            connect_timeout_seconds: Self::default_connect_timeout(),
            read_timeout_seconds: Self::default_read_timeout(),
            tls_verify: Self::default_tls_verify(),
        }
    }
}

impl ProbeConfig {
    fn default_scheme() -> String {
        DEFAULT_SCHEME.to_string()
    }

    fn default_path() -> String {
        DEFAULT_PATH.to_string()
    }

    fn default_header_name() -> String {
        TEST_HEADER_NAME.to_string()
    }

    fn default_header_value() -> String {
        TEST_HEADER_VALUE.to_string()
    }

    fn default_connect_timeout() -> u64 {
        DEFAULT_CONNECT_TIMEOUT_SECS
    }

    fn default_read_timeout() -> u64 {
        DEFAULT_READ_TIMEOUT_SECS
    }

    fn default_tls_verify() -> bool {
        true
    }

    /// Probe settings pointed at the given endpoint, everything else default
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    /// Endpoint with surrounding whitespace removed; blank counts as unset
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scheme != "http" && self.scheme != "https" {
            return Err(ConfigError::Validation(format!(
                "probe.scheme must be \"http\" or \"https\", got \"{}\"",
                self.scheme
            )));
        }
        if !self.path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "probe.path must start with '/', got \"{}\"",
                self.path
            )));
        }
        if self.connect_timeout_seconds == 0 || self.read_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "probe timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply the process environment.
    ///
    /// Without a file, built-in defaults are used. A missing `ALB_DNS_NAME` is not an
    /// error here: the probe reports `FAILED` for every invocation instead.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.probe.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML text without touching the environment
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.probe.validate()?;
        Ok(config)
    }

    /// Override file values with environment variables resolved through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV_VAR) {
            self.probe.endpoint = Some(endpoint);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
