//! Application configuration loaded from environment variables.

use serde::Deserialize;

use crate::error::{Result, WebhookError};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Interface the HTTP listener binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP listener port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,

    // === Logging ===
    /// Log filter (trace, debug, info, warn, error or a full directive).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit diagnostic logs as JSON instead of human-readable text.
    #[serde(default)]
    pub log_json: bool,

    /// Table the console lifecycle lines are routed to by the log collector.
    #[serde(default = "default_table_name")]
    pub table_name: String,

    // === Provider ===
    /// Description stamped into newly created internal metadata.
    #[serde(default = "default_metadata_description")]
    pub internal_metadata_description: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_table_name() -> String {
    "DefaultTable".to_string()
}

fn default_metadata_description() -> String {
    "This is your private data.".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
            rust_log: default_log_level(),
            log_json: false,
            table_name: default_table_name(),
            internal_metadata_description: default_metadata_description(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(WebhookError::InvalidConfig("HOST must not be empty".to_string()));
        }

        if self.table_name.trim().is_empty() {
            return Err(WebhookError::InvalidConfig(
                "TABLE_NAME must not be empty".to_string(),
            ));
        }

        if self.body_limit_bytes == 0 {
            return Err(WebhookError::InvalidConfig(
                "BODY_LIMIT_BYTES must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
