//! Configuration management for docstore.
//!
//! TOML-based configuration loading, parsing, and validation with
//! environment variable substitution (`${VAR_NAME}`) and protected secrets.
//!
//! # Example Configuration
//!
//! ```toml
//! [cosmos]
//! endpoint = "https://your-account.documents.azure.com:443/"
//! key = "${DOCSTORE_COSMOS_KEY}"
//! database_name = "appdata"
//!
//! [messaging]
//! namespace = "mybus"
//! topic_name = "orders"
//! sas_token = "${DOCSTORE_SB_SAS_TOKEN}"
//!
//! [logging]
//! level = "info"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{CosmosConfig, DocstoreConfig, LoggingConfig, MessagingConfig};
pub use secret::{secret_string, SecretString, SecretValue};
