use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::event::GenericEvent;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Publish failed on topic {topic}: {message}")]
    Publish { topic: String, message: String },
}

/// Outbound pub/sub boundary for lifecycle events.
///
/// Delivery is fire-and-forget from the caller's point of view: an error is reported
/// back, but judging never waits on or retries a failed publish.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), NotifyError>;
}

/// Writes every event to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), NotifyError> {
        info!(topic, %payload, "Event published");
        Ok(())
    }
}

/// Keeps published events in memory, in publish order.
#[derive(Debug, Default, Clone)]
pub struct MemoryPublisher {
    events: Arc<Mutex<Vec<GenericEvent>>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<GenericEvent> {
        self.events.lock().await.clone()
    }

    pub async fn topics(&self) -> Vec<String> {
        self.events
            .lock()
            .await
            .iter()
            .map(|e| e.topic.clone())
            .collect()
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), NotifyError> {
        self.events.lock().await.push(GenericEvent {
            topic: topic.to_string(),
            payload,
        });
        Ok(())
    }
}
