//! In-memory store-client implementation for integration tests
//!
//! Emulates the consumed store capability: id-addressed mutations with
//! conflict/not-found signals, partition scoping, store-assigned system
//! fields, and paged queries with numeric continuation tokens. Executed SQL
//! is recorded so tests can assert the exact fragments the engine built.

use async_trait::async_trait;
use docstore::domain::{CollectionDescriptor, Result, StoreError};
use docstore::repository::FetchParams;
use docstore::store::{QueryPage, StoreClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

struct StoredDoc {
    partition_key: Option<String>,
    id: String,
    body: Value,
}

struct Collection {
    partitioned: bool,
    docs: Vec<StoredDoc>,
}

#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, Collection>>,
    executed_sql: Mutex<Vec<String>>,
    ensure_calls: AtomicU64,
    fail_count_queries: AtomicBool,
    version_counter: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// SQL strings received by `query_documents`, in execution order.
    pub fn executed_sql(&self) -> Vec<String> {
        self.executed_sql.lock().unwrap().clone()
    }

    /// Number of ensure-collection calls received.
    pub fn ensure_calls(&self) -> u64 {
        self.ensure_calls.load(Ordering::SeqCst)
    }

    /// Force every subsequent count query to fail.
    pub fn fail_count_queries(&self) {
        self.fail_count_queries.store(true, Ordering::SeqCst);
    }

    /// Attach store-assigned system fields to a stored copy.
    fn stamp(&self, mut body: Value) -> Value {
        let version = self.version_counter.fetch_add(1, Ordering::SeqCst);
        if let Some(map) = body.as_object_mut() {
            map.insert("_etag".to_string(), json!(format!("\"{version:08x}\"")));
            map.insert("_ts".to_string(), json!(1_700_000_000 + version));
        }
        body
    }

    fn doc_id(document: &Value) -> Result<String> {
        document
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Serialization("document has no string id".to_string()))
    }

    fn check_partition_key(
        collection: &Collection,
        name: &str,
        partition_key: Option<&str>,
    ) -> Result<()> {
        if collection.partitioned && partition_key.is_none() {
            return Err(StoreError::PartitionKeyMismatch(format!(
                "collection {name} is partitioned but no partition key was supplied"
            )));
        }
        Ok(())
    }
}

/// Point operations address a document by exact (partition key, id); a
/// keyless lookup never reaches into a keyed partition.
fn matches_point(doc: &StoredDoc, partition_key: Option<&str>) -> bool {
    doc.partition_key.as_deref() == partition_key
}

/// Queries without a partition key scan every partition.
fn matches_scan(doc: &StoredDoc, partition_key: Option<&str>) -> bool {
    match partition_key {
        Some(pk) => doc.partition_key.as_deref() == Some(pk),
        None => true,
    }
}

/// Parse a `WHERE c.id = '...'` equality predicate.
fn parse_id_filter(sql: &str) -> Option<String> {
    let (_, rest) = sql.split_once("WHERE c.id = '")?;
    let (id, _) = rest.split_once('\'')?;
    Some(id.to_string())
}

/// Parse a trailing `OFFSET n LIMIT m` clause.
fn parse_offset_limit(sql: &str) -> Option<(usize, usize)> {
    let words: Vec<&str> = sql.split_whitespace().collect();
    let offset_at = words
        .iter()
        .position(|w| w.eq_ignore_ascii_case("OFFSET"))?;
    let offset = words.get(offset_at + 1)?.parse().ok()?;
    let limit_at = words.iter().position(|w| w.eq_ignore_ascii_case("LIMIT"))?;
    let limit = words.get(limit_at + 1)?.parse().ok()?;
    Some((offset, limit))
}

#[async_trait]
impl StoreClient for InMemoryStore {
    async fn ensure_collection(&self, descriptor: &CollectionDescriptor) -> Result<()> {
        self.ensure_calls.fetch_add(1, Ordering::SeqCst);
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(descriptor.name.clone())
            .or_insert_with(|| Collection {
                partitioned: descriptor.is_partitioned(),
                docs: Vec::new(),
            });
        Ok(())
    }

    async fn create_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        document: Value,
    ) -> Result<Value> {
        let id = Self::doc_id(&document)?;
        let stored = self.stamp(document);

        let mut collections = self.collections.lock().unwrap();
        let col = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::Query(format!("unknown collection {collection}")))?;
        Self::check_partition_key(col, collection, partition_key)?;

        let exists = col
            .docs
            .iter()
            .any(|d| d.id == id && matches_point(d, partition_key));
        if exists {
            return Err(StoreError::Conflict(format!(
                "document {id} already exists in {collection}"
            )));
        }

        col.docs.push(StoredDoc {
            partition_key: partition_key.map(str::to_string),
            id,
            body: stored.clone(),
        });
        Ok(stored)
    }

    async fn upsert_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        document: Value,
    ) -> Result<Value> {
        let id = Self::doc_id(&document)?;
        let stored = self.stamp(document);

        let mut collections = self.collections.lock().unwrap();
        let col = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::Query(format!("unknown collection {collection}")))?;
        Self::check_partition_key(col, collection, partition_key)?;

        if let Some(existing) = col
            .docs
            .iter_mut()
            .find(|d| d.id == id && matches_point(d, partition_key))
        {
            existing.body = stored.clone();
        } else {
            col.docs.push(StoredDoc {
                partition_key: partition_key.map(str::to_string),
                id,
                body: stored.clone(),
            });
        }
        Ok(stored)
    }

    async fn replace_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        id: &str,
        document: Value,
    ) -> Result<Value> {
        let stored = self.stamp(document);

        let mut collections = self.collections.lock().unwrap();
        let col = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::Query(format!("unknown collection {collection}")))?;
        Self::check_partition_key(col, collection, partition_key)?;

        match col
            .docs
            .iter_mut()
            .find(|d| d.id == id && matches_point(d, partition_key))
        {
            Some(existing) => {
                existing.body = stored.clone();
                Ok(stored)
            }
            None => Err(StoreError::NotFound(format!(
                "document {id} not found in {collection}"
            ))),
        }
    }

    async fn read_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        id: &str,
    ) -> Result<Value> {
        let collections = self.collections.lock().unwrap();
        let col = collections
            .get(collection)
            .ok_or_else(|| StoreError::Query(format!("unknown collection {collection}")))?;

        col.docs
            .iter()
            .find(|d| d.id == id && matches_point(d, partition_key))
            .map(|d| d.body.clone())
            .ok_or_else(|| {
                StoreError::NotFound(format!("document {id} not found in {collection}"))
            })
    }

    async fn delete_document(
        &self,
        collection: &str,
        partition_key: Option<&str>,
        id: &str,
    ) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        let col = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::Query(format!("unknown collection {collection}")))?;
        Self::check_partition_key(col, collection, partition_key)?;

        let before = col.docs.len();
        col.docs
            .retain(|d| !(d.id == id && matches_point(d, partition_key)));
        if col.docs.len() == before {
            return Err(StoreError::NotFound(format!(
                "document {id} not found in {collection}"
            )));
        }
        Ok(())
    }

    async fn query_documents(
        &self,
        collection: &str,
        sql: &str,
        fetch: &FetchParams,
    ) -> Result<QueryPage> {
        self.executed_sql.lock().unwrap().push(sql.to_string());

        let collections = self.collections.lock().unwrap();
        let col = collections
            .get(collection)
            .ok_or_else(|| StoreError::Query(format!("unknown collection {collection}")))?;

        let mut matching: Vec<Value> = col
            .docs
            .iter()
            .filter(|d| matches_scan(d, fetch.partition_key.as_deref()))
            .map(|d| d.body.clone())
            .collect();

        if let Some(id) = parse_id_filter(sql) {
            matching.retain(|d| d.get("id").and_then(Value::as_str) == Some(id.as_str()));
        }

        if sql.starts_with("SELECT VALUE COUNT(1)") {
            if self.fail_count_queries.load(Ordering::SeqCst) {
                return Err(StoreError::Query(
                    "count query failed by test configuration".to_string(),
                ));
            }
            return Ok(QueryPage {
                items: vec![json!(matching.len())],
                continuation: None,
            });
        }

        if let Some((offset, limit)) = parse_offset_limit(sql) {
            let total = matching.len();
            let items: Vec<Value> = matching.into_iter().skip(offset).take(limit).collect();
            let consumed = offset + items.len();
            let continuation = (consumed < total).then(|| consumed.to_string());
            return Ok(QueryPage {
                items,
                continuation,
            });
        }

        // Token pagination: the opaque token is the next start index.
        let start: usize = fetch
            .continuation_token
            .as_deref()
            .map(|token| {
                token.parse().map_err(|_| {
                    StoreError::Query(format!("malformed continuation token: {token}"))
                })
            })
            .transpose()?
            .unwrap_or(0);
        let start = start.min(matching.len());
        let end = (start + fetch.max_items as usize).min(matching.len());
        let continuation = (end < matching.len()).then(|| end.to_string());
        let items = matching[start..end].to_vec();

        Ok(QueryPage {
            items,
            continuation,
        })
    }
}
