//! Configuration management for ethscription-scout
//!
//! This module handles loading, parsing, and validating application configuration
//! from YAML files and environment variables. The resulting [`Config`] is built
//! once at startup and handed to every component that needs an endpoint or a
//! tuning value.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::ScriptionTemplate;

/// Prefix for the crate's own environment variables
const ENV_PREFIX: &str = "ETHSCRIPTION_SCOUT_";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Target network
    #[serde(default)]
    pub network: Network,

    /// Ethscriptions API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Availability scan configuration
    #[serde(default)]
    pub scan: ScanConfig,

    /// Retry policy for upstream calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Mint transaction settings
    #[serde(default)]
    pub mint: MintConfig,

    /// Content template with a `${id}` marker
    #[serde(default)]
    pub template: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(yaml);
        serde_yaml::from_str(&expanded)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    ///
    /// Reads `NETWORK`, `RECEIVER_ADDRESS` and `ETHSCRIPTION_TEMPLATE`, plus
    /// the `ETHSCRIPTION_SCOUT_*` overrides.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let prefixed = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(network) = lookup("NETWORK") {
            config.network = Network::from_name(&network);
        }

        config.mint.receiver_address =
            lookup("RECEIVER_ADDRESS").filter(|address| !address.is_empty());
        config.template = lookup("ETHSCRIPTION_TEMPLATE");

        if let Some(url) = prefixed("API_URL") {
            config.api.base_url = Some(url);
        }
        if let Some(per_page) = prefixed("PER_PAGE") {
            config.api.per_page = per_page
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid page size".to_string()))?;
        }
        if let Some(concurrency) = prefixed("CONCURRENCY") {
            config.scan.concurrency = concurrency
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid concurrency".to_string()))?;
        }
        if let Some(max_retries) = prefixed("MAX_RETRIES") {
            config.retry.max_retries = Some(
                max_retries
                    .parse()
                    .map_err(|_| ConfigError::Parse("Invalid retry count".to_string()))?,
            );
        }
        if let Some(level) = prefixed("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = prefixed("LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.concurrency == 0 {
            return Err(ConfigError::InvalidValue(
                "scan.concurrency must be at least 1".to_string(),
            ));
        }
        if self.api.per_page == 0 {
            return Err(ConfigError::InvalidValue(
                "api.per_page must be at least 1".to_string(),
            ));
        }
        if let Some(template) = &self.template {
            ScriptionTemplate::new(template.clone())
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        }
        Ok(())
    }

    /// Base URL of the ethscriptions API, honoring an explicit override
    pub fn api_base_url(&self) -> String {
        self.api
            .base_url
            .clone()
            .unwrap_or_else(|| self.network.api_base_url().to_string())
    }

    /// Build the content template used for minting and existence checks
    pub fn scription_template(&self) -> Result<ScriptionTemplate, ConfigError> {
        let raw = self
            .template
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired("ETHSCRIPTION_TEMPLATE".to_string()))?;
        ScriptionTemplate::new(raw).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

/// Ethereum network the tool talks to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum mainnet
    Mainnet,
    /// Goerli testnet
    #[default]
    Goerli,
}

impl Network {
    /// Parse a network name; anything other than `mainnet` selects Goerli
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("mainnet") {
            Network::Mainnet
        } else {
            Network::Goerli
        }
    }

    /// Default ethscriptions API base URL
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.ethscriptions.com/api",
            Network::Goerli => "https://goerli-api.ethscriptions.com/api",
        }
    }

    /// Block explorer base URL
    pub fn explorer_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://etherscan.io",
            Network::Goerli => "https://goerli.etherscan.io",
        }
    }

    /// Explorer link for a transaction hash
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url(), tx_hash)
    }
}

/// Ethscriptions API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Override for the network's default API base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Records requested per listing page
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            per_page: default_per_page(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_per_page() -> u32 {
    100
}

fn default_timeout() -> u64 {
    30
}

/// Availability scan configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Maximum existence checks in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    100
}

/// Retry configuration for upstream calls
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    /// Maximum retries after the first attempt; absent means retry forever
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// Fixed delay between attempts in milliseconds
    #[serde(default)]
    pub delay_ms: u64,
}

/// Mint transaction settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MintConfig {
    /// Address receiving minted ethscriptions; the signer's own address when absent
    #[serde(default)]
    pub receiver_address: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (`json` or `pretty`)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(String),

    /// Error parsing configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Expand environment variables in a string
///
/// Supports `${VAR_NAME}` syntax. Unknown variables are left untouched, which
/// keeps a template's own `${id}` marker intact.
fn expand_env_vars(input: &str) -> String {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .expect("Invalid regex pattern for environment variable expansion");

    re.replace_all(input, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
