//! Typed repository engine
//!
//! Generic over an entity type, the repository exposes CRUD, a
//! continuation-token streaming query, and an offset/limit paged query with
//! an optional concurrent total count. The engine is stateless across calls
//! apart from the collection descriptor resolved once at construction, so a
//! shared instance is safe for concurrent use.

use crate::domain::descriptor::{CollectionDescriptor, DocumentEntity};
use crate::domain::errors::StoreError;
use crate::domain::result::Result;
use crate::repository::options::{FetchParams, QueryOptions};
use crate::repository::results::{PagedResult, TokenPagedResult};
use crate::repository::sql;
use crate::store::traits::{QueryPage, StoreClient};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Typed repository over one collection of a document store
///
/// # Example
///
/// ```no_run
/// use docstore::config::load_config;
/// use docstore::repository::{DocumentRepository, QueryOptions};
/// use docstore::store::{CosmosStore, StoreContext};
/// use docstore::domain::{CollectionDescriptor, DocumentEntity};
/// use serde::{Deserialize, Serialize};
/// use std::sync::Arc;
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// struct Order {
///     id: String,
///     tenant_id: String,
/// }
///
/// impl DocumentEntity for Order {
///     fn descriptor() -> CollectionDescriptor {
///         CollectionDescriptor::new("orders").with_partition_key_path("/tenant_id")
///     }
///     fn id(&self) -> &str {
///         &self.id
///     }
///     fn partition_key(&self) -> Option<String> {
///         Some(self.tenant_id.clone())
///     }
/// }
///
/// # async fn example() -> docstore::domain::Result<()> {
/// let config = load_config("docstore.toml")?;
/// let context = Arc::new(StoreContext::connect(&config.cosmos).await?);
/// let store = Arc::new(CosmosStore::new(context));
/// let orders = DocumentRepository::<Order, _>::new(store).await?;
///
/// let options = QueryOptions::new().page_size(20).partition_key("acme");
/// let page = orders
///     .query_token_paged("SELECT * FROM c WHERE c.tenant_id = 'acme'", &options)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct DocumentRepository<T, S> {
    store: Arc<S>,
    descriptor: CollectionDescriptor,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S> DocumentRepository<T, S>
where
    T: DocumentEntity,
    S: StoreClient,
{
    /// Create a repository using the entity type's declared metadata.
    ///
    /// Ensures the backing collection exists; this resolution happens once
    /// and the descriptor is cached for the repository's lifetime.
    pub async fn new(store: Arc<S>) -> Result<Self> {
        Self::with_descriptor(store, T::descriptor()).await
    }

    /// Create a repository with an explicitly supplied descriptor.
    pub async fn with_descriptor(store: Arc<S>, descriptor: CollectionDescriptor) -> Result<Self> {
        tracing::info!(
            collection = %descriptor.name,
            default_ttl = descriptor.default_ttl_seconds,
            "Ensuring collection exists"
        );
        store.ensure_collection(&descriptor).await?;
        Ok(Self {
            store,
            descriptor,
            _entity: PhantomData,
        })
    }

    /// The collection metadata this repository was constructed with.
    pub fn descriptor(&self) -> &CollectionDescriptor {
        &self.descriptor
    }

    fn to_document(entity: &T) -> Result<Value> {
        serde_json::to_value(entity)
            .map_err(|e| StoreError::Serialization(format!("Failed to serialize entity: {e}")))
    }

    fn from_document(document: Value) -> Result<T> {
        serde_json::from_value(document)
            .map_err(|e| StoreError::Serialization(format!("Failed to deserialize entity: {e}")))
    }

    fn deserialize_page(page: QueryPage) -> Result<Vec<T>> {
        page.items.into_iter().map(Self::from_document).collect()
    }

    /// Insert a new entity and return the store's canonical copy.
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`] when an entity with the same id already
    /// exists in the same partition.
    pub async fn create(&self, entity: &T) -> Result<T> {
        let partition_key = entity.partition_key();
        let document = Self::to_document(entity)?;

        tracing::debug!(collection = %self.descriptor.name, id = %entity.id(), "Creating document");

        let stored = self
            .store
            .create_document(&self.descriptor.name, partition_key.as_deref(), document)
            .await?;
        Self::from_document(stored)
    }

    /// Insert or fully replace an entity by id; never conflicts.
    pub async fn upsert(&self, entity: &T) -> Result<T> {
        let partition_key = entity.partition_key();
        let document = Self::to_document(entity)?;

        tracing::debug!(collection = %self.descriptor.name, id = %entity.id(), "Upserting document");

        let stored = self
            .store
            .upsert_document(&self.descriptor.name, partition_key.as_deref(), document)
            .await?;
        Self::from_document(stored)
    }

    /// Replace an existing entity.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when `id` does not exist.
    pub async fn replace(&self, id: &str, entity: &T) -> Result<T> {
        let partition_key = entity.partition_key();
        let document = Self::to_document(entity)?;

        tracing::debug!(collection = %self.descriptor.name, id = %id, "Replacing document");

        let stored = self
            .store
            .replace_document(&self.descriptor.name, partition_key.as_deref(), id, document)
            .await?;
        Self::from_document(stored)
    }

    /// Read an entity by id without knowing its partition key.
    ///
    /// Unpartitioned collections are point-read directly. Partitioned
    /// collections cannot be point-read without a key, so the lookup falls
    /// back to a one-row cross-partition id query; both paths report a miss
    /// the same way.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when `id` does not exist.
    pub async fn get_by_id(&self, id: &str) -> Result<T> {
        if self.descriptor.is_partitioned() {
            return self.find_by_id_across_partitions(id).await;
        }
        let document = self
            .store
            .read_document(&self.descriptor.name, None, id)
            .await?;
        Self::from_document(document)
    }

    async fn find_by_id_across_partitions(&self, id: &str) -> Result<T> {
        let query = format!("SELECT * FROM c WHERE c.id = {}", sql::quote_literal(id));
        let mut fetch = FetchParams {
            max_items: 1,
            continuation_token: None,
            partition_key: None,
        };

        // Cross-partition scans may return empty pages before the match.
        loop {
            let page = self
                .store
                .query_documents(&self.descriptor.name, &query, &fetch)
                .await?;
            if let Some(document) = page.items.into_iter().next() {
                return Self::from_document(document);
            }
            match page.continuation {
                Some(token) => fetch.continuation_token = Some(token),
                None => {
                    return Err(StoreError::NotFound(format!(
                        "document {id} not found in {}",
                        self.descriptor.name
                    )))
                }
            }
        }
    }

    /// Point-read an entity by id within a partition.
    pub async fn get_by_id_in_partition(&self, id: &str, partition_key: &str) -> Result<T> {
        let document = self
            .store
            .read_document(&self.descriptor.name, Some(partition_key), id)
            .await?;
        Self::from_document(document)
    }

    /// Read an entity by id, returning `None` on a miss.
    ///
    /// Only the "not found" signal is converted to an absent value; every
    /// other failure propagates.
    pub async fn try_get_by_id(&self, id: &str) -> Result<Option<T>> {
        match self.get_by_id(id).await {
            Ok(entity) => Ok(Some(entity)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Point-read within a partition, returning `None` on a miss.
    pub async fn try_get_by_id_in_partition(
        &self,
        id: &str,
        partition_key: &str,
    ) -> Result<Option<T>> {
        match self.get_by_id_in_partition(id, partition_key).await {
            Ok(entity) => Ok(Some(entity)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete an entity by id from an unpartitioned collection.
    ///
    /// # Errors
    ///
    /// [`StoreError::PartitionKeyMismatch`] when the collection is
    /// partitioned; use [`delete_in_partition`](Self::delete_in_partition)
    /// instead. [`StoreError::NotFound`] when `id` does not exist.
    pub async fn delete(&self, id: &str) -> Result<()> {
        if self.descriptor.is_partitioned() {
            return Err(StoreError::PartitionKeyMismatch(format!(
                "collection {} is partitioned; a partition key is required to delete",
                self.descriptor.name
            )));
        }

        tracing::debug!(collection = %self.descriptor.name, id = %id, "Deleting document");

        self.store
            .delete_document(&self.descriptor.name, None, id)
            .await
    }

    /// Delete an entity by id within a partition.
    pub async fn delete_in_partition(&self, id: &str, partition_key: &str) -> Result<()> {
        tracing::debug!(collection = %self.descriptor.name, id = %id, "Deleting document");

        self.store
            .delete_document(&self.descriptor.name, Some(partition_key), id)
            .await
    }

    /// Execute a query and return one continuation-token page.
    ///
    /// Exactly one store-defined page is fetched; the engine never loops
    /// internal fetches to fill a fixed count. Hand the returned token back
    /// unmodified to continue the scan; an absent token means the scan is
    /// exhausted.
    pub async fn query_token_paged(
        &self,
        sql: &str,
        options: &QueryOptions,
    ) -> Result<TokenPagedResult<T>> {
        let fetch = options.fetch_params();

        tracing::debug!(
            collection = %self.descriptor.name,
            max_items = fetch.max_items,
            "Token-paged query"
        );

        let page = self
            .store
            .query_documents(&self.descriptor.name, sql, &fetch)
            .await?;
        let token = page.continuation.clone();
        let data = Self::deserialize_page(page)?;

        Ok(TokenPagedResult { data, token })
    }

    /// Execute an offset/limit paged query, optionally with a total count.
    ///
    /// The data query runs against `sql` with an `OFFSET/LIMIT` suffix
    /// derived from the options. When `requires_total_count` is set, a count
    /// query runs concurrently and both must complete before the result is
    /// assembled; failure of either branch fails the whole call and no
    /// partial result is returned.
    pub async fn query_paged(&self, sql: &str, options: &QueryOptions) -> Result<PagedResult<T>> {
        let paged_sql = options.with_offset_limit(sql)?;
        let mut fetch = options.fetch_params();
        // Offset pagination recomputes the position; continuation tokens
        // belong to the token-paged path.
        fetch.continuation_token = None;

        tracing::debug!(
            collection = %self.descriptor.name,
            page_number = options.page_number,
            page_size = options.page_size,
            requires_total_count = options.requires_total_count,
            "Offset-paged query"
        );

        let partition_key = fetch.partition_key.clone();
        let data_query = self
            .store
            .query_documents(&self.descriptor.name, &paged_sql, &fetch);

        let (page, total_count) = if options.requires_total_count {
            let count_query = async {
                self.count(sql, partition_key.as_deref())
                    .await
                    .map_err(|e| StoreError::CountQuery(e.to_string()))
            };
            let (page, total) = tokio::try_join!(data_query, count_query)?;
            (page, Some(total))
        } else {
            (data_query.await?, None)
        };

        let has_next_page = page
            .continuation
            .as_deref()
            .is_some_and(|token| !token.is_empty());
        let data = Self::deserialize_page(page)?;

        Ok(PagedResult {
            data,
            page_number: options.page_number.max(1),
            page_size: options.page_size,
            has_next_page,
            total_count,
        })
    }

    /// Count documents matching a query.
    ///
    /// The caller's SQL is rewritten at its FROM clause into
    /// `SELECT VALUE COUNT(1) FROM …`, preserving every predicate after FROM
    /// verbatim. An absent partition key opts into cross-partition execution
    /// explicitly.
    pub async fn count(&self, sql: &str, partition_key: Option<&str>) -> Result<u64> {
        let count_query = sql::count_sql(sql)?;
        let fetch = FetchParams {
            max_items: 1,
            continuation_token: None,
            partition_key: partition_key.map(str::to_string),
        };

        tracing::debug!(
            collection = %self.descriptor.name,
            cross_partition = fetch.cross_partition(),
            "Count query"
        );

        let page = self
            .store
            .query_documents(&self.descriptor.name, &count_query, &fetch)
            .await?;

        let value = page
            .items
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Query("count query returned no rows".to_string()))?;
        value.as_u64().ok_or_else(|| {
            StoreError::Query(format!("count query returned a non-numeric value: {value}"))
        })
    }

    /// Fetch one page of the whole collection.
    ///
    /// Legacy convenience kept for pre-pagination-model callers; equivalent
    /// to a token-paged `SELECT TOP {max_items} * FROM c`. Only suitable for
    /// small result sets.
    pub async fn get_all(
        &self,
        max_items: u32,
        continuation_token: Option<String>,
    ) -> Result<TokenPagedResult<T>> {
        let sql = format!("SELECT TOP {max_items} * FROM c");
        let mut options = QueryOptions::new().page_size(max_items);
        options.continuation_token = continuation_token;
        self.query_token_paged(&sql, &options).await
    }
}
