//! Topic publisher
//!
//! A pure marshal-and-forward layer: serialize a typed message and a
//! property bag into a JSON envelope and hand it to the send capability.
//! No retry, batching, or ordering logic lives here.

use crate::domain::errors::StoreError;
use crate::domain::result::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// MIME tag attached to every published payload
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Topic send capability consumed by the publisher
#[async_trait]
pub trait TopicSender: Send + Sync {
    /// Forward a payload with its content-type tag and user properties.
    async fn send(
        &self,
        payload: Vec<u8>,
        content_type: &str,
        properties: &HashMap<String, String>,
    ) -> Result<()>;
}

/// Serializes typed messages and forwards them to a topic
pub struct TopicPublisher<T, S> {
    sender: Arc<S>,
    _message: PhantomData<fn(T)>,
}

impl<T, S> TopicPublisher<T, S>
where
    T: Serialize + Send + Sync,
    S: TopicSender,
{
    /// Create a publisher over a send capability.
    pub fn new(sender: Arc<S>) -> Self {
        Self {
            sender,
            _message: PhantomData,
        }
    }

    /// Publish a message with no user properties.
    pub async fn publish(&self, message: &T) -> Result<()> {
        self.publish_with_properties(message, &HashMap::new()).await
    }

    /// Publish a message with a bag of user-visible metadata properties.
    ///
    /// # Errors
    ///
    /// [`StoreError::Serialization`] if the message cannot be serialized,
    /// [`StoreError::Messaging`] if the send fails.
    pub async fn publish_with_properties(
        &self,
        message: &T,
        properties: &HashMap<String, String>,
    ) -> Result<()> {
        let payload = serde_json::to_vec(message)
            .map_err(|e| StoreError::Serialization(format!("Failed to serialize message: {e}")))?;

        tracing::debug!(
            payload_bytes = payload.len(),
            properties = properties.len(),
            "Publishing message"
        );

        self.sender
            .send(payload, CONTENT_TYPE_JSON, properties)
            .await
    }
}
