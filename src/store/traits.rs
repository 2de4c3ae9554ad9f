//! Store client abstraction
//!
//! This trait is the seam between the typed repository engine and the
//! underlying document store: point reads, id-addressed mutations, a
//! SQL-like query returning one store-defined page per call, and
//! ensure-collection-exists provisioning. [`super::cosmos::CosmosStore`]
//! implements it against Azure Cosmos DB; tests implement it in memory.

use crate::domain::descriptor::CollectionDescriptor;
use crate::domain::result::Result;
use crate::repository::options::FetchParams;
use async_trait::async_trait;
use serde_json::Value;

/// One page of raw query results as the store returned it
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    /// Documents in store-return order
    pub items: Vec<Value>,

    /// Continuation token for the next page, absent when exhausted
    pub continuation: Option<String>,
}

/// Document store capability consumed by repositories
///
/// Implementations must be safe for concurrent calls; the repository engine
/// issues independent asynchronous operations against a shared instance and
/// holds no cross-call locks.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Ensure the collection described by `descriptor` exists, creating it
    /// with the declared time-to-live and partition-key path if necessary.
    async fn ensure_collection(&self, descriptor: &CollectionDescriptor) -> Result<()>;

    /// Insert a new document.
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`](crate::domain::StoreError::Conflict) when a
    /// document with the same id already exists in the same partition.
    async fn create_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        document: Value,
    ) -> Result<Value>;

    /// Insert or fully replace a document by id.
    async fn upsert_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        document: Value,
    ) -> Result<Value>;

    /// Replace an existing document.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`](crate::domain::StoreError::NotFound) when the
    /// id does not exist.
    async fn replace_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        id: &str,
        document: Value,
    ) -> Result<Value>;

    /// Point-read a document by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`](crate::domain::StoreError::NotFound) when the
    /// id does not exist.
    async fn read_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        id: &str,
    ) -> Result<Value>;

    /// Delete a document by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`](crate::domain::StoreError::NotFound) when the
    /// id does not exist (repeated deletes are not absorbed).
    async fn delete_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        id: &str,
    ) -> Result<()>;

    /// Execute a SQL-like query and return exactly one store-defined page.
    ///
    /// The continuation token in `fetch` is consumed verbatim; a fetch
    /// without a partition key opts into cross-partition execution
    /// explicitly.
    async fn query_documents(
        &self,
        collection: &str,
        sql: &str,
        fetch: &FetchParams,
    ) -> Result<QueryPage>;
}
