//! Store context owning the signed HTTP channel to the account
//!
//! No Rust SDK currently exposes caller-supplied continuation tokens,
//! per-page item limits, and content-on-write responses, so the store talks
//! to the Cosmos DB REST API over reqwest, signing each request with the
//! account master key per the documented HMAC-SHA256 scheme. The context
//! resolves database identity once at connection time; repositories never
//! touch the HTTP channel directly.

use crate::config::CosmosConfig;
use crate::domain::errors::StoreError;
use crate::domain::result::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Method;
use secrecy::ExposeSecret;
use sha2::Sha256;
use std::time::Duration;

const API_VERSION: &str = "2018-12-31";

/// Connection context for one Cosmos DB database
pub struct StoreContext {
    /// HTTP client with the configured request timeout
    http: reqwest::Client,

    /// Account endpoint without a trailing slash
    endpoint: String,

    /// Decoded master key used to sign every request
    signing_key: Vec<u8>,

    /// Resolved database name
    database_name: String,

    /// Provisioned throughput applied when collections are created
    throughput: u32,
}

impl StoreContext {
    /// Connect to the account and ensure the database exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] if the account key is not valid
    /// base64, [`StoreError::Connection`] if the HTTP client cannot be built
    /// or the account cannot be reached, and [`StoreError::Provisioning`] if
    /// the database cannot be created.
    pub async fn connect(config: &CosmosConfig) -> Result<Self> {
        let signing_key = BASE64
            .decode(config.key.expose_secret().as_ref())
            .map_err(|e| {
                StoreError::Configuration(format!("Account key is not valid base64: {e}"))
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| StoreError::Connection(format!("Failed to create HTTP client: {e}")))?;

        let context = Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            signing_key,
            database_name: config.database_name.clone(),
            throughput: config.throughput,
        };
        context.ensure_database_exists().await?;
        Ok(context)
    }

    /// Ensure the database exists, creating it if necessary.
    async fn ensure_database_exists(&self) -> Result<()> {
        let link = format!("dbs/{}", self.database_name);
        let response = self
            .signed_request(Method::GET, "dbs", &link, &link)?
            .send()
            .await
            .map_err(request_error)?;

        if response.status().is_success() {
            tracing::info!(database = %self.database_name, "Database already exists");
            return Ok(());
        }
        if response.status().as_u16() != 404 {
            return Err(StoreError::Connection(format!(
                "Failed to read database {}: {}",
                self.database_name,
                response.status()
            )));
        }

        tracing::info!(database = %self.database_name, "Creating database");

        let response = self
            .signed_request(Method::POST, "dbs", "", "dbs")?
            .json(&serde_json::json!({ "id": self.database_name }))
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Provisioning(format!(
                "Failed to create database {}: {status}: {body}",
                self.database_name
            )));
        }

        tracing::info!(database = %self.database_name, "Database created");
        Ok(())
    }

    /// Verify connectivity by reading the database.
    pub async fn test_connection(&self) -> Result<()> {
        let link = format!("dbs/{}", self.database_name);
        let response = self
            .signed_request(Method::GET, "dbs", &link, &link)?
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(StoreError::Connection(format!(
                "Connection test failed: {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Build a request carrying the signature, date, and API version headers.
    ///
    /// `resource_link` is the addressed resource for signing purposes (the
    /// parent for feed operations); `path` is the request path on the account
    /// endpoint.
    pub(crate) fn signed_request(
        &self,
        method: Method,
        resource_type: &str,
        resource_link: &str,
        path: &str,
    ) -> Result<reqwest::RequestBuilder> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let token = self.authorization(method.as_str(), resource_type, resource_link, &date)?;
        let url = format!("{}/{}", self.endpoint, path);

        Ok(self
            .http
            .request(method, url)
            .header("Authorization", token)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION))
    }

    /// Compute the master-key authorization token for one request.
    fn authorization(
        &self,
        verb: &str,
        resource_type: &str,
        resource_link: &str,
        date: &str,
    ) -> Result<String> {
        let payload = string_to_sign(verb, resource_type, resource_link, date);
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.signing_key)
            .map_err(|e| StoreError::Configuration(format!("Invalid signing key: {e}")))?;
        mac.update(payload.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());
        let encoded: String = url::form_urlencoded::byte_serialize(signature.as_bytes()).collect();
        Ok(format!("type%3Dmaster%26ver%3D1.0%26sig%3D{encoded}"))
    }

    /// Resource link of a collection, e.g. `dbs/appdata/colls/orders`.
    pub(crate) fn collection_link(&self, collection: &str) -> String {
        format!("dbs/{}/colls/{}", self.database_name, collection)
    }

    /// Resource link of a document within a collection.
    pub(crate) fn document_link(&self, collection: &str, id: &str) -> String {
        format!("{}/docs/{}", self.collection_link(collection), id)
    }

    /// Get the provisioned throughput for collection creation.
    pub(crate) fn throughput(&self) -> u32 {
        self.throughput
    }

    /// Get the resolved database name.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

/// Map a transport-level failure onto the domain error kinds.
pub(crate) fn request_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() || e.is_connect() {
        StoreError::Transient(format!("Store request failed: {e}"))
    } else {
        StoreError::Connection(format!("Store request failed: {e}"))
    }
}

/// Signature payload: lowercase verb and date, resource type and link
/// verbatim, two trailing newlines.
fn string_to_sign(verb: &str, resource_type: &str, resource_link: &str, date: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.to_lowercase(),
        resource_type,
        resource_link,
        date.to_lowercase()
    )
}
