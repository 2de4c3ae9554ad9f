// Docstore - typed repository layer for Azure Cosmos DB
// Copyright (c) 2026 Docstore Contributors
// Licensed under the MIT License

//! # Docstore
//!
//! Docstore is a typed data-access layer over Azure Cosmos DB: a generic
//! repository abstraction with create, upsert, replace, point-read, delete,
//! and two pagination styles, plus a thin topic publisher for Service Bus.
//!
//! ## Architecture
//!
//! - [`domain`] - Error types, result alias, entity/collection metadata
//! - [`config`] - TOML configuration with protected secrets
//! - [`store`] - Store-client seam and its Cosmos DB implementation
//! - [`repository`] - Query option model and the typed repository engine
//! - [`messaging`] - Topic publishing
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docstore::config::load_config;
//! use docstore::domain::{CollectionDescriptor, DocumentEntity};
//! use docstore::repository::{DocumentRepository, QueryOptions};
//! use docstore::store::{CosmosStore, StoreContext};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Order {
//!     id: String,
//!     tenant_id: String,
//!     total_cents: i64,
//! }
//!
//! impl DocumentEntity for Order {
//!     fn descriptor() -> CollectionDescriptor {
//!         CollectionDescriptor::new("orders").with_partition_key_path("/tenant_id")
//!     }
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//!     fn partition_key(&self) -> Option<String> {
//!         Some(self.tenant_id.clone())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> docstore::domain::Result<()> {
//!     let config = load_config("docstore.toml")?;
//!     let context = Arc::new(StoreContext::connect(&config.cosmos).await?);
//!     let store = Arc::new(CosmosStore::new(context));
//!
//!     let orders = DocumentRepository::<Order, _>::new(store).await?;
//!
//!     let order = Order {
//!         id: "order-1".to_string(),
//!         tenant_id: "acme".to_string(),
//!         total_cents: 4999,
//!     };
//!     orders.create(&order).await?;
//!
//!     let options = QueryOptions::new()
//!         .page_size(20)
//!         .partition_key("acme")
//!         .with_total_count();
//!     let page = orders
//!         .query_paged("SELECT * FROM c WHERE c.tenant_id = 'acme'", &options)
//!         .await?;
//!     println!("{} of {:?} orders", page.data.len(), page.total_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Pagination
//!
//! Continuation-token and offset/limit pagination are mutually exclusive
//! strategies. Token paging threads the store's opaque cursor:
//!
//! ```rust,ignore
//! let mut options = QueryOptions::new().page_size(100);
//! loop {
//!     let page = orders.query_token_paged(sql, &options).await?;
//!     handle(page.data);
//!     match page.token {
//!         Some(token) => options.continuation_token = Some(token),
//!         None => break,
//!     }
//! }
//! ```

pub mod config;
pub mod domain;
pub mod logging;
pub mod messaging;
pub mod repository;
pub mod store;

// Re-export the most commonly used types at the crate root
pub use domain::{CollectionDescriptor, DocumentEntity, Result, StoreError};
pub use repository::{DocumentRepository, PagedResult, QueryOptions, TokenPagedResult};
pub use store::{CosmosStore, StoreClient, StoreContext};
