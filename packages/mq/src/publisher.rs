use std::sync::Arc;

use async_trait::async_trait;
use common::event::GenericEvent;
use common::notify::{NotifyError, Publisher};
use tracing::debug;

use crate::models::MqQueue;

/// Publishes lifecycle events to the broker, one queue per topic.
///
/// The queue for topic `submission/42` with prefix `judge` is `judge:submission/42`.
/// Payloads travel wrapped in a [`GenericEvent`] so consumers see the topic too.
pub struct MqPublisher {
    queue: Arc<MqQueue>,
    prefix: String,
}

impl MqPublisher {
    pub fn new(queue: Arc<MqQueue>, prefix: impl Into<String>) -> Self {
        Self {
            queue,
            prefix: prefix.into(),
        }
    }
}

fn queue_name(prefix: &str, topic: &str) -> String {
    if prefix.is_empty() {
        topic.to_string()
    } else {
        format!("{prefix}:{topic}")
    }
}

#[async_trait]
impl Publisher for MqPublisher {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), NotifyError> {
        let queue_name = queue_name(&self.prefix, topic);
        let event = GenericEvent {
            topic: topic.to_string(),
            payload,
        };

        self.queue
            .publish(&queue_name, None, &event, None)
            .await
            .map_err(|e| NotifyError::Publish {
                topic: topic.to_string(),
                message: e.to_string(),
            })?;

        debug!(queue = %queue_name, "Event published to MQ");
        Ok(())
    }
}
