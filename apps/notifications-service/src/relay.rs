//! Relays broker task events onto the websocket broadcast channel.
//!
//! Inbound subjects are renamed to the event names clients subscribe to:
//! `task_created` becomes `new_task`, `task_updated` becomes `updated_task`,
//! `task_deleted` stays as is.

use eyre::Result;
use messaging::{MessageBroker, subjects};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Outbound websocket frame: the client-facing event name plus the payload
/// exactly as the owning service published it.
#[derive(Debug, Serialize)]
struct PushFrame<'a> {
    event: &'a str,
    data: serde_json::Value,
}

/// Client-facing event name for a broker subject.
fn push_event_name(subject: &str) -> Option<&'static str> {
    match subject {
        subjects::TASK_CREATED => Some("new_task"),
        subjects::TASK_UPDATED => Some("updated_task"),
        subjects::TASK_DELETED => Some("task_deleted"),
        _ => None,
    }
}

/// Build the serialized frame for one broker message, or None when the
/// subject is unknown or the payload is not valid JSON.
fn build_frame(subject: &str, payload: &[u8]) -> Option<String> {
    let event = push_event_name(subject)?;

    let data: serde_json::Value = match serde_json::from_slice(payload) {
        Ok(data) => data,
        Err(e) => {
            warn!(subject = %subject, error = %e, "Dropping non-JSON event payload");
            return None;
        }
    };

    match serde_json::to_string(&PushFrame { event, data }) {
        Ok(frame) => Some(frame),
        Err(e) => {
            error!(subject = %subject, error = %e, "Failed to serialize push frame");
            None
        }
    }
}

/// Subscribes to the task event subjects and fans frames out to every
/// connected websocket session.
pub struct EventRelay {
    broker: Arc<dyn MessageBroker>,
    tx: broadcast::Sender<String>,
}

impl EventRelay {
    pub fn new(broker: Arc<dyn MessageBroker>, tx: broadcast::Sender<String>) -> Self {
        Self { broker, tx }
    }

    /// Subscribe to all task events and relay until the streams close.
    pub async fn run(&self) -> Result<()> {
        let mut workers = Vec::with_capacity(subjects::TASK_EVENTS.len());

        for subject in subjects::TASK_EVENTS {
            let mut stream = self
                .broker
                .queue_subscribe(subject, subjects::NOTIFICATIONS_QUEUE_GROUP)
                .await?;

            info!(subject = %subject, "Subscribed to task events");

            let tx = self.tx.clone();
            workers.push(tokio::spawn(async move {
                while let Some(msg) = stream.next().await {
                    if let Some(frame) = build_frame(&msg.subject, &msg.payload) {
                        // Err means no connected clients right now; events
                        // are best-effort so that is not a failure.
                        let receivers = tx.send(frame).unwrap_or(0);
                        debug!(subject = %msg.subject, receivers, "Relayed event");
                    }
                }
            }));
        }

        for worker in workers {
            if let Err(e) = worker.await {
                error!(error = %e, "Relay worker panicked");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_event_is_renamed_for_clients() {
        let frame = build_frame(subjects::TASK_CREATED, br#"{"id":"abc"}"#).unwrap();
        let json: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(json["event"], "new_task");
        assert_eq!(json["data"]["id"], "abc");
    }

    #[test]
    fn test_updated_event_is_renamed_for_clients() {
        let frame = build_frame(subjects::TASK_UPDATED, b"{}").unwrap();
        let json: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(json["event"], "updated_task");
    }

    #[test]
    fn test_deleted_event_keeps_its_name() {
        let frame = build_frame(subjects::TASK_DELETED, br#"{"id":"abc","userId":"u1"}"#).unwrap();
        let json: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(json["event"], "task_deleted");
        assert_eq!(json["data"]["userId"], "u1");
    }

    #[test]
    fn test_unknown_subject_is_dropped() {
        assert!(build_frame("some_other_subject", b"{}").is_none());
    }

    #[test]
    fn test_malformed_payload_is_dropped() {
        assert!(build_frame(subjects::TASK_CREATED, b"not json").is_none());
    }

    #[tokio::test]
    async fn test_frames_fan_out_to_all_receivers() {
        let (tx, mut rx_a) = broadcast::channel::<String>(8);
        let mut rx_b = tx.subscribe();

        let frame = build_frame(subjects::TASK_CREATED, br#"{"id":"abc"}"#).unwrap();
        tx.send(frame.clone()).unwrap();

        assert_eq!(rx_a.recv().await.unwrap(), frame);
        assert_eq!(rx_b.recv().await.unwrap(), frame);
    }

    #[tokio::test]
    async fn test_send_without_receivers_is_not_an_error_path() {
        let (tx, rx) = broadcast::channel::<String>(8);
        drop(rx);

        // Mirrors the relay loop: a send with no subscribers is ignored.
        let receivers = tx.send("frame".to_string()).unwrap_or(0);
        assert_eq!(receivers, 0);
    }
}
