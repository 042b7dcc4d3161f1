//! Service-side command dispatch loop.
//!
//! A [`Responder`] owns the queue-group subscriptions for one service and
//! relays each incoming command to a [`CommandHandler`], wrapping the outcome
//! in the tagged reply envelope before publishing it to the reply subject.

use crate::broker::{MessageBroker, MessageStream, ReceivedMessage};
use crate::rpc::{RpcError, RpcReply};
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Handles one decoded command payload for a subject this service owns.
#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    async fn handle(&self, subject: &str, payload: &[u8]) -> Result<serde_json::Value, RpcError>;
}

/// Queue-group subscriber that replies to commands with [`RpcReply`] envelopes.
pub struct Responder {
    broker: Arc<dyn MessageBroker>,
    queue_group: String,
}

impl Responder {
    pub fn new(broker: Arc<dyn MessageBroker>, queue_group: impl Into<String>) -> Self {
        Self {
            broker,
            queue_group: queue_group.into(),
        }
    }

    /// Subscribe to all subjects and serve commands until the streams close.
    ///
    /// Each message is handled on its own task so one slow command does not
    /// block the others.
    pub async fn run<H: CommandHandler>(&self, subjects: &[&str], handler: Arc<H>) -> Result<()> {
        let mut workers = Vec::with_capacity(subjects.len());

        for subject in subjects {
            let mut stream = self
                .broker
                .queue_subscribe(subject, &self.queue_group)
                .await?;

            info!(subject = %subject, queue_group = %self.queue_group, "Subscribed");

            let handler = handler.clone();
            let broker = self.broker.clone();

            workers.push(tokio::spawn(async move {
                while let Some(msg) = stream.next().await {
                    let handler = handler.clone();
                    let broker = broker.clone();

                    tokio::spawn(async move {
                        Self::dispatch(broker, handler, msg).await;
                    });
                }
            }));
        }

        for worker in workers {
            if let Err(e) = worker.await {
                error!(error = %e, "Responder worker panicked");
            }
        }

        Ok(())
    }

    async fn dispatch<H: CommandHandler>(
        broker: Arc<dyn MessageBroker>,
        handler: Arc<H>,
        msg: ReceivedMessage,
    ) {
        let subject = msg.subject.clone();
        let result = handler.handle(&msg.subject, &msg.payload).await;

        if let Err(ref err) = result {
            warn!(subject = %subject, kind = ?err.kind, error = %err.message, "Command failed");
        }

        let Some(reply_to) = msg.reply else {
            // Fire-and-forget message on a command subject; nothing to answer.
            return;
        };

        let reply = RpcReply::from(result);
        let payload = match serde_json::to_vec(&reply) {
            Ok(payload) => payload,
            Err(e) => {
                error!(subject = %subject, error = %e, "Failed to serialize reply");
                return;
            }
        };

        if let Err(e) = broker.publish(&reply_to, payload).await {
            error!(subject = %subject, error = %e, "Failed to publish reply");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// In-memory broker: queue subscriptions are fed by the test, publishes
    /// are recorded.
    struct LoopbackBroker {
        incoming: Mutex<Option<mpsc::Receiver<ReceivedMessage>>>,
        published: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl LoopbackBroker {
        fn new(rx: mpsc::Receiver<ReceivedMessage>) -> Self {
            Self {
                incoming: Mutex::new(Some(rx)),
                published: Mutex::new(Vec::new()),
            }
        }
    }

    struct ChannelStream {
        rx: mpsc::Receiver<ReceivedMessage>,
    }

    #[async_trait]
    impl MessageStream for ChannelStream {
        async fn next(&mut self) -> Option<ReceivedMessage> {
            self.rx.recv().await
        }
    }

    #[async_trait]
    impl MessageBroker for LoopbackBroker {
        async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<()> {
            self.published
                .lock()
                .unwrap()
                .push((subject.to_string(), payload));
            Ok(())
        }

        async fn request(&self, _subject: &str, _payload: Vec<u8>) -> Result<Vec<u8>> {
            unimplemented!()
        }

        async fn subscribe(&self, _subject: &str) -> Result<Box<dyn MessageStream>> {
            unimplemented!()
        }

        async fn queue_subscribe(
            &self,
            _subject: &str,
            _queue_group: &str,
        ) -> Result<Box<dyn MessageStream>> {
            let rx = self.incoming.lock().unwrap().take().expect("one subject");
            Ok(Box::new(ChannelStream { rx }))
        }
    }

    struct EchoHandler;

    #[async_trait]
    impl CommandHandler for EchoHandler {
        async fn handle(
            &self,
            subject: &str,
            payload: &[u8],
        ) -> Result<serde_json::Value, RpcError> {
            match subject {
                "echo" => Ok(serde_json::from_slice(payload)
                    .map_err(|e| RpcError::validation(e.to_string()))?),
                _ => Err(RpcError::not_found(format!("Unknown command: {}", subject))),
            }
        }
    }

    #[tokio::test]
    async fn test_dispatch_replies_with_ok_envelope() {
        let (tx, rx) = mpsc::channel(4);
        let broker = Arc::new(LoopbackBroker::new(rx));

        tx.send(ReceivedMessage {
            subject: "echo".to_string(),
            payload: br#"{"hello":"world"}"#.to_vec(),
            reply: Some("_INBOX.1".to_string()),
        })
        .await
        .unwrap();
        drop(tx);

        let responder = Responder::new(broker.clone(), "test-group");
        responder.run(&["echo"], Arc::new(EchoHandler)).await.unwrap();

        let published = broker.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "_INBOX.1");

        let reply: RpcReply<serde_json::Value> = serde_json::from_slice(&published[0].1).unwrap();
        assert_eq!(
            reply.into_result().unwrap(),
            serde_json::json!({"hello": "world"})
        );
    }

    #[tokio::test]
    async fn test_dispatch_replies_with_err_envelope() {
        let (tx, rx) = mpsc::channel(4);
        let broker = Arc::new(LoopbackBroker::new(rx));

        tx.send(ReceivedMessage {
            subject: "unknown_command".to_string(),
            payload: b"{}".to_vec(),
            reply: Some("_INBOX.2".to_string()),
        })
        .await
        .unwrap();
        drop(tx);

        let responder = Responder::new(broker.clone(), "test-group");
        responder
            .run(&["unknown_command"], Arc::new(EchoHandler))
            .await
            .unwrap();

        let published = broker.published.lock().unwrap();
        let reply: RpcReply<serde_json::Value> = serde_json::from_slice(&published[0].1).unwrap();
        let err = reply.into_result().unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_dispatch_skips_messages_without_reply_subject() {
        let (tx, rx) = mpsc::channel(4);
        let broker = Arc::new(LoopbackBroker::new(rx));

        tx.send(ReceivedMessage {
            subject: "echo".to_string(),
            payload: b"{}".to_vec(),
            reply: None,
        })
        .await
        .unwrap();
        drop(tx);

        let responder = Responder::new(broker.clone(), "test-group");
        responder.run(&["echo"], Arc::new(EchoHandler)).await.unwrap();

        assert!(broker.published.lock().unwrap().is_empty());
    }
}
