//! Cosmos DB implementation of the store client
//!
//! Maps the store capability onto the document REST operations: page size and
//! continuation travel as `x-ms-max-item-count` / `x-ms-continuation`
//! headers, writes return the stored document in the response body, and
//! failures are classified into domain error kinds by HTTP status.

use crate::domain::descriptor::CollectionDescriptor;
use crate::domain::errors::StoreError;
use crate::domain::result::Result;
use crate::repository::options::FetchParams;
use crate::store::context::{request_error, StoreContext};
use crate::store::traits::{QueryPage, StoreClient};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Store client backed by Azure Cosmos DB
pub struct CosmosStore {
    context: Arc<StoreContext>,
}

#[derive(Deserialize)]
struct QueryResponseBody {
    #[serde(rename = "Documents", default)]
    documents: Vec<Value>,
}

impl CosmosStore {
    /// Create a store over an established context.
    pub fn new(context: Arc<StoreContext>) -> Self {
        Self { context }
    }

    /// Get a reference to the underlying context.
    pub fn context(&self) -> &Arc<StoreContext> {
        &self.context
    }

    /// Partition-key header value for a point operation.
    ///
    /// Unpartitioned collections are provisioned with `/id` as their
    /// partition-key path, so the document id doubles as the key.
    fn partition_key_header(partition_key: Option<&str>, id: &str) -> String {
        serde_json::json!([partition_key.unwrap_or(id)]).to_string()
    }

    /// Extract the id field from an outgoing document.
    fn document_id(document: &Value) -> Result<String> {
        document
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                StoreError::Serialization("document is missing a string `id` field".to_string())
            })
    }

    /// Consume a failed response into a classified domain error.
    async fn read_error(
        response: reqwest::Response,
        context: String,
        fallback: fn(String) -> StoreError,
    ) -> StoreError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        classify_status(status, &body, context, fallback)
    }

    async fn write_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        document: Value,
        upsert: bool,
    ) -> Result<Value> {
        let id = Self::document_id(&document)?;
        let link = self.context.collection_link(collection);
        let path = format!("{link}/docs");

        let mut request = self
            .context
            .signed_request(Method::POST, "docs", &link, &path)?
            .header(
                "x-ms-documentdb-partitionkey",
                Self::partition_key_header(partition_key, &id),
            )
            .json(&document);
        if upsert {
            request = request.header("x-ms-documentdb-is-upsert", "true");
        }

        let response = request.send().await.map_err(request_error)?;
        if !response.status().is_success() {
            let verb = if upsert { "upsert" } else { "create" };
            return Err(Self::read_error(
                response,
                format!("Failed to {verb} document {id} in {collection}"),
                StoreError::Connection,
            )
            .await);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::Serialization(format!("Failed to read stored copy: {e}")))
    }
}

/// Classify a failed response by its HTTP status.
fn classify_status(
    status: u16,
    body: &str,
    context: String,
    fallback: fn(String) -> StoreError,
) -> StoreError {
    let message = format!("{context}: {status}: {body}");
    match status {
        404 => StoreError::NotFound(message),
        409 => StoreError::Conflict(message),
        408 | 429 | 503 => StoreError::Transient(message),
        400 if body.contains("partition key") || body.contains("PartitionKey") => {
            StoreError::PartitionKeyMismatch(message)
        }
        _ => fallback(message),
    }
}

#[async_trait]
impl StoreClient for CosmosStore {
    async fn ensure_collection(&self, descriptor: &CollectionDescriptor) -> Result<()> {
        let link = self.context.collection_link(&descriptor.name);
        let response = self
            .context
            .signed_request(Method::GET, "colls", &link, &link)?
            .send()
            .await
            .map_err(request_error)?;

        if response.status().is_success() {
            tracing::info!(collection = %descriptor.name, "Collection already exists");
            return Ok(());
        }
        if response.status().as_u16() != 404 {
            return Err(Self::read_error(
                response,
                format!("Failed to read collection {}", descriptor.name),
                StoreError::Provisioning,
            )
            .await);
        }

        let partition_key_path = descriptor
            .partition_key_path
            .clone()
            .unwrap_or_else(|| "/id".to_string());

        tracing::info!(
            collection = %descriptor.name,
            partition_key_path = %partition_key_path,
            "Creating collection"
        );

        let body = serde_json::json!({
            "id": descriptor.name,
            "partitionKey": { "paths": [partition_key_path], "kind": "Hash" },
            "defaultTtl": descriptor.default_ttl_seconds,
        });

        let parent = format!("dbs/{}", self.context.database_name());
        let path = format!("{parent}/colls");
        let response = self
            .context
            .signed_request(Method::POST, "colls", &parent, &path)?
            .header("x-ms-offer-throughput", self.context.throughput().to_string())
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(Self::read_error(
                response,
                format!("Failed to create collection {}", descriptor.name),
                StoreError::Provisioning,
            )
            .await);
        }

        tracing::info!(collection = %descriptor.name, "Collection created");
        Ok(())
    }

    async fn create_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        document: Value,
    ) -> Result<Value> {
        self.write_document(collection, partition_key, document, false)
            .await
    }

    async fn upsert_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        document: Value,
    ) -> Result<Value> {
        self.write_document(collection, partition_key, document, true)
            .await
    }

    async fn replace_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        id: &str,
        document: Value,
    ) -> Result<Value> {
        let link = self.context.document_link(collection, id);
        let response = self
            .context
            .signed_request(Method::PUT, "docs", &link, &link)?
            .header(
                "x-ms-documentdb-partitionkey",
                Self::partition_key_header(partition_key, id),
            )
            .json(&document)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(Self::read_error(
                response,
                format!("Failed to replace document {id} in {collection}"),
                StoreError::Connection,
            )
            .await);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::Serialization(format!("Failed to read stored copy: {e}")))
    }

    async fn read_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        id: &str,
    ) -> Result<Value> {
        let link = self.context.document_link(collection, id);

        tracing::debug!(collection = %collection, id = %id, "Point read");

        let response = self
            .context
            .signed_request(Method::GET, "docs", &link, &link)?
            .header(
                "x-ms-documentdb-partitionkey",
                Self::partition_key_header(partition_key, id),
            )
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(Self::read_error(
                response,
                format!("Failed to read document {id} in {collection}"),
                StoreError::Connection,
            )
            .await);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::Serialization(format!("Failed to deserialize document: {e}")))
    }

    async fn delete_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        id: &str,
    ) -> Result<()> {
        let link = self.context.document_link(collection, id);
        let response = self
            .context
            .signed_request(Method::DELETE, "docs", &link, &link)?
            .header(
                "x-ms-documentdb-partitionkey",
                Self::partition_key_header(partition_key, id),
            )
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(Self::read_error(
                response,
                format!("Failed to delete document {id} in {collection}"),
                StoreError::Connection,
            )
            .await);
        }

        Ok(())
    }

    async fn query_documents(
        &self,
        collection: &str,
        sql: &str,
        fetch: &FetchParams,
    ) -> Result<QueryPage> {
        let link = self.context.collection_link(collection);
        let path = format!("{link}/docs");

        tracing::debug!(
            collection = %collection,
            max_items = fetch.max_items,
            cross_partition = fetch.cross_partition(),
            has_continuation = fetch.continuation_token.is_some(),
            "Executing query page"
        );

        let mut request = self
            .context
            .signed_request(Method::POST, "docs", &link, &path)?
            .header("Content-Type", "application/query+json")
            .header("x-ms-documentdb-isquery", "true")
            .header("x-ms-max-item-count", fetch.max_items.to_string());

        // A fetch without a partition key opts into cross-partition execution.
        request = match fetch.partition_key.as_deref() {
            Some(pk) => request.header(
                "x-ms-documentdb-partitionkey",
                serde_json::json!([pk]).to_string(),
            ),
            None => request.header("x-ms-documentdb-query-enablecrosspartition", "true"),
        };
        if let Some(token) = fetch.continuation_token.as_deref() {
            request = request.header("x-ms-continuation", token);
        }

        let payload = serde_json::json!({ "query": sql, "parameters": [] });
        let response = request
            .body(payload.to_string())
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(Self::read_error(
                response,
                format!("Query failed in {collection}"),
                StoreError::Query,
            )
            .await);
        }

        let continuation = response
            .headers()
            .get("x-ms-continuation")
            .and_then(|value| value.to_str().ok())
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        let body: QueryResponseBody = response.json().await.map_err(|e| {
            StoreError::Serialization(format!("Failed to deserialize query results: {e}"))
        })?;

        Ok(QueryPage {
            items: body.documents,
            continuation,
        })
    }
}
