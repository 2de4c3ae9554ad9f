//! Structured logging setup using tracing
//!
//! # Example
//!
//! ```no_run
//! use docstore::config::LoggingConfig;
//! use docstore::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! init_logging(&config).expect("Failed to initialize logging");
//! ```

use crate::config::LoggingConfig;
use crate::domain::errors::StoreError;
use crate::domain::result::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the logging system based on configuration
///
/// Sets up an `EnvFilter` (overridable via `RUST_LOG`, defaulting to
/// `docstore=<level>`) with either a human-readable or JSON fmt layer.
///
/// # Errors
///
/// Returns [`StoreError::Configuration`] if a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docstore={}", config.level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    let init_result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    init_result
        .map_err(|e| StoreError::Configuration(format!("Failed to initialize logging: {e}")))
}
