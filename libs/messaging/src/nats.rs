//! NATS implementation of the MessageBroker trait

use crate::broker::{MessageBroker, MessageStream, ReceivedMessage};
use async_nats::{Client, Subscriber};
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use tracing::instrument;

/// NATS-based message broker implementation
pub struct NatsBroker {
    client: Client,
}

impl NatsBroker {
    /// Connect to a NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        let client = async_nats::connect(url)
            .await
            .wrap_err_with(|| format!("Failed to connect to NATS at {}", url))?;

        Ok(Self { client })
    }

    /// Connect with a connection name (shows up in NATS monitoring)
    pub async fn connect_with_name(url: &str, name: &str) -> Result<Self> {
        let client = async_nats::ConnectOptions::new()
            .name(name)
            .connect(url)
            .await
            .wrap_err_with(|| format!("Failed to connect to NATS at {}", url))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl MessageBroker for NatsBroker {
    #[instrument(skip(self, payload), fields(subject = %subject))]
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .wrap_err("Failed to publish message")?;
        Ok(())
    }

    #[instrument(skip(self, payload), fields(subject = %subject))]
    async fn request(&self, subject: &str, payload: Vec<u8>) -> Result<Vec<u8>> {
        let response = self
            .client
            .request(subject.to_string(), payload.into())
            .await
            .wrap_err("Request failed")?;

        Ok(response.payload.to_vec())
    }

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn MessageStream>> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .wrap_err_with(|| format!("Failed to subscribe to {}", subject))?;

        Ok(Box::new(NatsMessageStream { subscriber }))
    }

    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Box<dyn MessageStream>> {
        let subscriber = self
            .client
            .queue_subscribe(subject.to_string(), queue_group.to_string())
            .await
            .wrap_err_with(|| format!("Failed to queue subscribe to {}", subject))?;

        Ok(Box::new(NatsMessageStream { subscriber }))
    }
}

/// NATS message stream wrapper
struct NatsMessageStream {
    subscriber: Subscriber,
}

#[async_trait]
impl MessageStream for NatsMessageStream {
    async fn next(&mut self) -> Option<ReceivedMessage> {
        use futures::StreamExt;

        self.subscriber.next().await.map(|msg| ReceivedMessage {
            subject: msg.subject.to_string(),
            payload: msg.payload.to_vec(),
            reply: msg.reply.map(|s| s.to_string()),
        })
    }
}
