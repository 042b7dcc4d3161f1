//! Fire-and-forget domain event publishing.

use crate::broker::MessageBroker;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Best-effort event publisher.
///
/// Event emission is at-most-once: a failed publish is logged and never
/// surfaced to the caller, since the originating write already committed.
#[derive(Clone)]
pub struct EventPublisher {
    broker: Arc<dyn MessageBroker>,
    source: &'static str,
}

impl EventPublisher {
    pub fn new(broker: Arc<dyn MessageBroker>, source: &'static str) -> Self {
        Self { broker, source }
    }

    /// Publish an event to a subject
    #[instrument(skip(self, event), fields(subject = %subject, source = %self.source))]
    pub async fn publish<T: Serialize>(&self, subject: &str, event: &T) {
        match serde_json::to_vec(event) {
            Ok(payload) => {
                if let Err(e) = self.broker.publish(subject, payload).await {
                    error!(error = %e, subject = %subject, "Failed to publish event");
                } else {
                    debug!(subject = %subject, "Event published");
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to serialize event");
            }
        }
    }
}
