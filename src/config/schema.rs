//! Configuration schema types
//!
//! Root structure maps to a TOML file with `[cosmos]`, optional `[messaging]`,
//! and `[logging]` sections.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main docstore configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocstoreConfig {
    /// Cosmos DB account configuration
    pub cosmos: CosmosConfig,

    /// Service Bus topic configuration (required only when publishing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messaging: Option<MessagingConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DocstoreConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.cosmos.validate()?;
        if let Some(ref messaging) = self.messaging {
            messaging.validate()?;
        }
        self.logging.validate()?;
        Ok(())
    }
}

/// Cosmos DB account configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmosConfig {
    /// Account endpoint, e.g. `https://myaccount.documents.azure.com:443/`
    pub endpoint: String,

    /// Account key (protected in memory)
    pub key: SecretString,

    /// Database name; created if it does not exist
    pub database_name: String,

    /// Provisioned throughput (RU/s) used when the database is created
    #[serde(default = "default_throughput")]
    pub throughput: u32,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_throughput() -> u32 {
    400
}

fn default_request_timeout() -> u64 {
    30
}

impl CosmosConfig {
    /// Validates the Cosmos configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("cosmos.endpoint must not be empty".to_string());
        }
        if !self.endpoint.starts_with("https://") {
            return Err(format!(
                "cosmos.endpoint must use https, got: {}",
                self.endpoint
            ));
        }
        if self.database_name.is_empty() {
            return Err("cosmos.database_name must not be empty".to_string());
        }
        if self.throughput < 400 {
            return Err(format!(
                "cosmos.throughput must be at least 400 RU/s, got: {}",
                self.throughput
            ));
        }
        Ok(())
    }
}

/// Service Bus topic configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Service Bus namespace, e.g. `mybus` for `mybus.servicebus.windows.net`
    pub namespace: String,

    /// Topic name to publish to
    pub topic_name: String,

    /// Pre-signed shared access signature token for the topic
    pub sas_token: SecretString,

    /// Send timeout in seconds
    #[serde(default = "default_send_timeout")]
    pub send_timeout_seconds: u64,
}

fn default_send_timeout() -> u64 {
    30
}

impl MessagingConfig {
    /// Validates the messaging configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.namespace.is_empty() {
            return Err("messaging.namespace must not be empty".to_string());
        }
        if self.topic_name.is_empty() {
            return Err("messaging.topic_name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted logs instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Validates the logging configuration
    pub fn validate(&self) -> Result<(), String> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(format!("logging.level is not a valid level: {other}")),
        }
    }
}
