//! Collection metadata declared per entity type
//!
//! The original attribute-based lookup is replaced with an explicit descriptor:
//! entity types declare their collection name, default time-to-live, and
//! optional partition-key path through [`DocumentEntity`], or callers pass a
//! [`CollectionDescriptor`] directly at repository construction.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Describes the collection backing an entity type
///
/// Resolved once per entity type at repository construction, cached immutably
/// for the repository's lifetime, and handed to the store's
/// ensure-collection-exists capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDescriptor {
    /// Collection/container name
    pub name: String,

    /// Default time-to-live in seconds; -1 disables expiry
    pub default_ttl_seconds: i32,

    /// Partition-key path (e.g. `/tenant_id`); `None` for unpartitioned collections
    pub partition_key_path: Option<String>,
}

impl CollectionDescriptor {
    /// Create a descriptor with TTL disabled and no partition key.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_ttl_seconds: -1,
            partition_key_path: None,
        }
    }

    /// Set the default time-to-live in seconds.
    pub fn with_ttl(mut self, seconds: i32) -> Self {
        self.default_ttl_seconds = seconds;
        self
    }

    /// Set the partition-key path.
    pub fn with_partition_key_path(mut self, path: impl Into<String>) -> Self {
        self.partition_key_path = Some(path.into());
        self
    }

    /// Whether the backing collection is partitioned.
    pub fn is_partitioned(&self) -> bool {
        self.partition_key_path.is_some()
    }
}

/// Declarative metadata for a document entity type
///
/// Entities are plain serde structs identified by a string `id` field.
/// The repository never retains references to an entity beyond a call.
///
/// # Example
///
/// ```
/// use docstore::domain::{CollectionDescriptor, DocumentEntity};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// struct Order {
///     id: String,
///     tenant_id: String,
///     total_cents: i64,
/// }
///
/// impl DocumentEntity for Order {
///     fn descriptor() -> CollectionDescriptor {
///         CollectionDescriptor::new("orders")
///             .with_ttl(-1)
///             .with_partition_key_path("/tenant_id")
///     }
///
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn partition_key(&self) -> Option<String> {
///         Some(self.tenant_id.clone())
///     }
/// }
/// ```
pub trait DocumentEntity: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Collection metadata for this entity type.
    fn descriptor() -> CollectionDescriptor;

    /// String identifier of this instance.
    fn id(&self) -> &str;

    /// Partition-key value of this instance, when the collection is partitioned.
    fn partition_key(&self) -> Option<String> {
        None
    }
}
