//! Domain error types
//!
//! This module defines the error hierarchy for docstore. All errors are
//! domain-specific and don't expose third-party SDK types.

use thiserror::Error;

/// Main docstore error type
///
/// This is the primary error type used throughout the crate. Store-level
/// failures are classified by the status signal the store reported so callers
/// can distinguish not-found, conflict, and throttling without reaching into
/// SDK types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Target document does not exist (point read, replace, delete)
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Create against an id that already exists in the same partition
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation against a partitioned collection without a resolvable partition key
    #[error("Partition key mismatch: {0}")]
    PartitionKeyMismatch(String),

    /// Malformed SQL or store-side query execution failure
    #[error("Query failed: {0}")]
    Query(String),

    /// The count half of a paged query failed
    #[error("Count query failed: {0}")]
    CountQuery(String),

    /// Throttling or network signal from the store; propagated, never retried here
    #[error("Transient store error: {0}")]
    Transient(String),

    /// Failed to reach or authenticate with the store
    #[error("Connection error: {0}")]
    Connection(String),

    /// Database or collection provisioning failure
    #[error("Provisioning error: {0}")]
    Provisioning(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Topic publishing errors
    #[error("Messaging error: {0}")]
    Messaging(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl StoreError {
    /// Whether this error is the store's "not found" signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Whether this error is the store's "conflict" signal.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }

    /// Whether this error is a throttling/network signal worth retrying upstream.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Configuration(format!("TOML parse error: {err}"))
    }
}
