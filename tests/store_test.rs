//! Integration tests for the Cosmos store client against a mock HTTP endpoint
//!
//! Verifies the wire contract: signed request headers, page size and
//! continuation pass-through, canonical write-back bodies, collection
//! provisioning payloads, and status classification.

use docstore::config::{secret_string, CosmosConfig};
use docstore::domain::CollectionDescriptor;
use docstore::repository::FetchParams;
use docstore::store::{CosmosStore, StoreClient, StoreContext};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;

// base64 of "mock-account-key"
const MOCK_KEY: &str = "bW9jay1hY2NvdW50LWtleQ==";

async fn connected_store(server: &mut ServerGuard) -> CosmosStore {
    let database_mock = server
        .mock("GET", "/dbs/appdata")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let config = CosmosConfig {
        endpoint: server.url(),
        key: secret_string(MOCK_KEY.to_string()),
        database_name: "appdata".to_string(),
        throughput: 400,
        request_timeout_seconds: 5,
    };
    let context = StoreContext::connect(&config).await.unwrap();
    database_mock.assert_async().await;
    CosmosStore::new(Arc::new(context))
}

#[tokio::test]
async fn test_query_sends_page_size_and_continuation_verbatim() {
    let mut server = Server::new_async().await;
    let store = connected_store(&mut server).await;

    let query_mock = server
        .mock("POST", "/dbs/appdata/colls/orders/docs")
        .match_header("content-type", "application/query+json")
        .match_header("x-ms-documentdb-isquery", "true")
        .match_header("x-ms-max-item-count", "10")
        .match_header("x-ms-continuation", "token-from-previous-page")
        .match_header("x-ms-documentdb-partitionkey", r#"["acme"]"#)
        .match_header(
            "authorization",
            Matcher::Regex("type%3Dmaster%26ver%3D1.0%26sig%3D.+".to_string()),
        )
        .match_body(Matcher::PartialJson(json!({ "query": "SELECT * FROM c" })))
        .with_status(200)
        .with_header("x-ms-continuation", "token-for-next-page")
        .with_body(r#"{"Documents":[{"id":"o1","tenant_id":"acme"}],"_count":1}"#)
        .create_async()
        .await;

    let fetch = FetchParams {
        max_items: 10,
        continuation_token: Some("token-from-previous-page".to_string()),
        partition_key: Some("acme".to_string()),
    };
    let page = store
        .query_documents("orders", "SELECT * FROM c", &fetch)
        .await
        .unwrap();

    query_mock.assert_async().await;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0]["id"], "o1");
    assert_eq!(page.continuation.as_deref(), Some("token-for-next-page"));
}

#[tokio::test]
async fn test_keyless_query_opts_into_cross_partition() {
    let mut server = Server::new_async().await;
    let store = connected_store(&mut server).await;

    let query_mock = server
        .mock("POST", "/dbs/appdata/colls/orders/docs")
        .match_header("x-ms-documentdb-query-enablecrosspartition", "true")
        .match_header("x-ms-max-item-count", "5")
        .with_status(200)
        .with_body(r#"{"Documents":[],"_count":0}"#)
        .create_async()
        .await;

    let fetch = FetchParams {
        max_items: 5,
        continuation_token: None,
        partition_key: None,
    };
    let page = store
        .query_documents("orders", "SELECT * FROM c", &fetch)
        .await
        .unwrap();

    query_mock.assert_async().await;
    assert!(page.items.is_empty());
    // No continuation header means the scan is exhausted.
    assert!(page.continuation.is_none());
}

#[tokio::test]
async fn test_create_returns_store_copy_with_system_fields() {
    let mut server = Server::new_async().await;
    let store = connected_store(&mut server).await;

    let create_mock = server
        .mock("POST", "/dbs/appdata/colls/orders/docs")
        .match_header("x-ms-documentdb-partitionkey", r#"["acme"]"#)
        .with_status(201)
        .with_body(r#"{"id":"o1","tenant_id":"acme","_etag":"\"00000001\"","_ts":1700000000}"#)
        .create_async()
        .await;

    let stored = store
        .create_document(
            "orders",
            Some("acme"),
            json!({"id": "o1", "tenant_id": "acme"}),
        )
        .await
        .unwrap();

    create_mock.assert_async().await;
    assert_eq!(stored["_etag"], "\"00000001\"");
    assert_eq!(stored["_ts"], 1_700_000_000);
}

#[tokio::test]
async fn test_upsert_sends_upsert_header() {
    let mut server = Server::new_async().await;
    let store = connected_store(&mut server).await;

    let upsert_mock = server
        .mock("POST", "/dbs/appdata/colls/orders/docs")
        .match_header("x-ms-documentdb-is-upsert", "true")
        .with_status(200)
        .with_body(r#"{"id":"o1","tenant_id":"acme"}"#)
        .create_async()
        .await;

    store
        .upsert_document(
            "orders",
            Some("acme"),
            json!({"id": "o1", "tenant_id": "acme"}),
        )
        .await
        .unwrap();

    upsert_mock.assert_async().await;
}

#[tokio::test]
async fn test_ensure_collection_creates_with_declared_partition_key() {
    let mut server = Server::new_async().await;
    let store = connected_store(&mut server).await;

    let read_mock = server
        .mock("GET", "/dbs/appdata/colls/orders")
        .with_status(404)
        .with_body(r#"{"code":"NotFound"}"#)
        .create_async()
        .await;
    let create_mock = server
        .mock("POST", "/dbs/appdata/colls")
        .match_header("x-ms-offer-throughput", "400")
        .match_body(Matcher::PartialJson(json!({
            "id": "orders",
            "partitionKey": { "paths": ["/tenant_id"], "kind": "Hash" },
            "defaultTtl": -1,
        })))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let descriptor = CollectionDescriptor::new("orders").with_partition_key_path("/tenant_id");
    store.ensure_collection(&descriptor).await.unwrap();

    read_mock.assert_async().await;
    create_mock.assert_async().await;
}

#[tokio::test]
async fn test_status_signals_classify_into_domain_errors() {
    let mut server = Server::new_async().await;
    let store = connected_store(&mut server).await;

    server
        .mock("GET", "/dbs/appdata/colls/orders/docs/missing")
        .with_status(404)
        .with_body(r#"{"code":"NotFound"}"#)
        .create_async()
        .await;
    let err = store
        .read_document("orders", Some("acme"), "missing")
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    server
        .mock("POST", "/dbs/appdata/colls/events/docs")
        .with_status(409)
        .with_body(r#"{"code":"Conflict"}"#)
        .create_async()
        .await;
    let err = store
        .create_document("events", Some("acme"), json!({"id": "e1"}))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    server
        .mock("POST", "/dbs/appdata/colls/metrics/docs")
        .with_status(429)
        .with_body(r#"{"code":"TooManyRequests"}"#)
        .create_async()
        .await;
    let fetch = FetchParams {
        max_items: 1,
        continuation_token: None,
        partition_key: None,
    };
    let err = store
        .query_documents("metrics", "SELECT * FROM c", &fetch)
        .await
        .unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_delete_succeeds_on_no_content() {
    let mut server = Server::new_async().await;
    let store = connected_store(&mut server).await;

    let delete_mock = server
        .mock("DELETE", "/dbs/appdata/colls/orders/docs/o1")
        .match_header("x-ms-documentdb-partitionkey", r#"["acme"]"#)
        .with_status(204)
        .create_async()
        .await;

    store
        .delete_document("orders", Some("acme"), "o1")
        .await
        .unwrap();
    delete_mock.assert_async().await;
}
