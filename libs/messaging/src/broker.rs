use async_trait::async_trait;
use eyre::Result;
use serde::de::DeserializeOwned;

/// Received message with metadata
pub struct ReceivedMessage {
    /// Subject the message was received on
    pub subject: String,
    /// Raw payload bytes
    pub payload: Vec<u8>,
    /// Reply subject for request/reply patterns
    pub reply: Option<String>,
}

impl ReceivedMessage {
    /// Deserialize the payload
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T> {
        let data: T = serde_json::from_slice(&self.payload)?;
        Ok(data)
    }
}

/// Abstract message broker interface.
///
/// The production implementation is [`crate::NatsBroker`]; tests use
/// in-memory implementations.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publish raw bytes to a subject (fire-and-forget)
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<()>;

    /// Request/reply: send a payload and wait for exactly one reply.
    ///
    /// Callers bound this with a timeout; see [`crate::RpcClient`].
    async fn request(&self, subject: &str, payload: Vec<u8>) -> Result<Vec<u8>>;

    /// Subscribe to a subject and receive messages
    async fn subscribe(&self, subject: &str) -> Result<Box<dyn MessageStream>>;

    /// Queue-group subscription (load-balanced across service instances)
    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Box<dyn MessageStream>>;
}

/// Stream of incoming messages
#[async_trait]
pub trait MessageStream: Send + Sync {
    /// Receive the next message (blocks until available)
    async fn next(&mut self) -> Option<ReceivedMessage>;
}
