//! Service Bus topic sender over the REST endpoint
//!
//! There is no dedicated Service Bus crate yet, so the send capability is
//! implemented against the REST API with a pre-signed SAS token from
//! configuration. Custom properties travel as HTTP headers per the Service
//! Bus REST contract.

use crate::config::MessagingConfig;
use crate::domain::errors::StoreError;
use crate::domain::result::Result;
use crate::messaging::publisher::TopicSender;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::time::Duration;

/// Topic sender posting to `https://{namespace}.servicebus.windows.net/{topic}/messages`
pub struct RestTopicSender {
    endpoint: String,
    sas_token: String,
    http_client: reqwest::Client,
}

impl RestTopicSender {
    /// Create a sender from messaging configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &MessagingConfig) -> Result<Self> {
        let endpoint = format!(
            "https://{}.servicebus.windows.net/{}/messages",
            config.namespace, config.topic_name
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.send_timeout_seconds))
            .build()
            .map_err(|e| {
                StoreError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            endpoint,
            sas_token: config.sas_token.expose_secret().as_ref().to_string(),
            http_client,
        })
    }

    /// The topic endpoint messages are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TopicSender for RestTopicSender {
    async fn send(
        &self,
        payload: Vec<u8>,
        content_type: &str,
        properties: &HashMap<String, String>,
    ) -> Result<()> {
        let mut request = self
            .http_client
            .post(&self.endpoint)
            .header("Authorization", &self.sas_token)
            .header("Content-Type", content_type)
            .body(payload);

        for (key, value) in properties {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                StoreError::Transient(format!("Topic send failed: {e}"))
            } else {
                StoreError::Messaging(format!("Topic send failed: {e}"))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(endpoint = %self.endpoint, "Message sent");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = format!("Topic send rejected with {status}: {body}");
        if status.as_u16() == 429 || status.is_server_error() {
            Err(StoreError::Transient(message))
        } else {
            Err(StoreError::Messaging(message))
        }
    }
}
