//! Request/reply envelope and client.
//!
//! Every command reply crosses the broker as a tagged result so callers can
//! distinguish domain errors from transport failures without parsing
//! exception-shaped blobs.

use crate::broker::MessageBroker;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

/// Domain error kinds carried across the broker.
///
/// Each kind has exactly one HTTP status translation at the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input (400)
    Validation,
    /// Missing, invalid or expired credential (401)
    Unauthorized,
    /// Uniqueness violation (409)
    Conflict,
    /// Referenced entity absent (404)
    NotFound,
    /// Unexpected failure (500)
    Internal,
}

/// Structured error envelope carried back across the reply channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind:?}: {message}")]
pub struct RpcError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RpcError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

/// Tagged reply envelope: `{"ok": ...}` or `{"err": {"kind": ..., "message": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcReply<T> {
    Ok(T),
    Err(RpcError),
}

impl<T> RpcReply<T> {
    pub fn into_result(self) -> Result<T, RpcError> {
        match self {
            RpcReply::Ok(value) => Ok(value),
            RpcReply::Err(err) => Err(err),
        }
    }
}

impl<T> From<Result<T, RpcError>> for RpcReply<T> {
    fn from(result: Result<T, RpcError>) -> Self {
        match result {
            Ok(value) => RpcReply::Ok(value),
            Err(err) => RpcReply::Err(err),
        }
    }
}

/// Failure modes of a request/reply round trip as seen by the caller
#[derive(Debug, Error)]
pub enum RpcFailure {
    /// The owning service replied with a domain error
    #[error("service error: {0}")]
    Domain(RpcError),

    /// No reply arrived within the configured timeout
    #[error("request to '{subject}' timed out after {timeout:?}")]
    Timeout { subject: String, timeout: Duration },

    /// Broker connectivity or delivery failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Reply did not match the expected envelope shape
    #[error("failed to decode reply: {0}")]
    Decode(String),
}

/// Request/reply client with a mandatory per-call timeout.
///
/// A broker round trip must never hang the caller indefinitely; a timeout
/// or connection failure surfaces as [`RpcFailure`], which the gateway maps
/// to a generic 5xx.
#[derive(Clone)]
pub struct RpcClient {
    broker: Arc<dyn MessageBroker>,
    timeout: Duration,
}

impl RpcClient {
    pub fn new(broker: Arc<dyn MessageBroker>, timeout: Duration) -> Self {
        Self { broker, timeout }
    }

    /// Send one command and wait for exactly one reply.
    #[instrument(skip(self, request), fields(subject = %subject))]
    pub async fn call<Req, Res>(&self, subject: &str, request: &Req) -> Result<Res, RpcFailure>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        let payload =
            serde_json::to_vec(request).map_err(|e| RpcFailure::Decode(e.to_string()))?;

        let raw = tokio::time::timeout(self.timeout, self.broker.request(subject, payload))
            .await
            .map_err(|_| RpcFailure::Timeout {
                subject: subject.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|e| RpcFailure::Transport(e.to_string()))?;

        let reply: RpcReply<Res> =
            serde_json::from_slice(&raw).map_err(|e| RpcFailure::Decode(e.to_string()))?;

        reply.into_result().map_err(RpcFailure::Domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{MessageStream, ReceivedMessage};
    use async_trait::async_trait;
    use eyre::Result;

    #[test]
    fn test_ok_reply_shape() {
        let reply: RpcReply<serde_json::Value> = RpcReply::Ok(serde_json::json!({"id": 1}));
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json, serde_json::json!({"ok": {"id": 1}}));
    }

    #[test]
    fn test_err_reply_shape() {
        let reply: RpcReply<serde_json::Value> =
            RpcReply::Err(RpcError::not_found("Task not found"));
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"err": {"kind": "not_found", "message": "Task not found"}})
        );
    }

    #[test]
    fn test_reply_round_trip() {
        let raw = br#"{"err":{"kind":"conflict","message":"Username or email already exists"}}"#;
        let reply: RpcReply<serde_json::Value> = serde_json::from_slice(raw).unwrap();
        let err = reply.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    /// Broker that replies with a fixed payload
    struct FixedReplyBroker {
        reply: Vec<u8>,
    }

    #[async_trait]
    impl MessageBroker for FixedReplyBroker {
        async fn publish(&self, _subject: &str, _payload: Vec<u8>) -> Result<()> {
            Ok(())
        }

        async fn request(&self, _subject: &str, _payload: Vec<u8>) -> Result<Vec<u8>> {
            Ok(self.reply.clone())
        }

        async fn subscribe(&self, _subject: &str) -> Result<Box<dyn MessageStream>> {
            unimplemented!()
        }

        async fn queue_subscribe(
            &self,
            _subject: &str,
            _queue_group: &str,
        ) -> Result<Box<dyn MessageStream>> {
            unimplemented!()
        }
    }

    /// Broker whose requests never complete
    struct StalledBroker;

    #[async_trait]
    impl MessageBroker for StalledBroker {
        async fn publish(&self, _subject: &str, _payload: Vec<u8>) -> Result<()> {
            Ok(())
        }

        async fn request(&self, _subject: &str, _payload: Vec<u8>) -> Result<Vec<u8>> {
            futures::future::pending().await
        }

        async fn subscribe(&self, _subject: &str) -> Result<Box<dyn MessageStream>> {
            unimplemented!()
        }

        async fn queue_subscribe(
            &self,
            _subject: &str,
            _queue_group: &str,
        ) -> Result<Box<dyn MessageStream>> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_call_unwraps_ok_envelope() {
        let broker = Arc::new(FixedReplyBroker {
            reply: br#"{"ok":{"value":42}}"#.to_vec(),
        });
        let client = RpcClient::new(broker, Duration::from_secs(1));

        let res: serde_json::Value = client.call("some_command", &()).await.unwrap();
        assert_eq!(res, serde_json::json!({"value": 42}));
    }

    #[tokio::test]
    async fn test_call_surfaces_domain_error() {
        let broker = Arc::new(FixedReplyBroker {
            reply: br#"{"err":{"kind":"unauthorized","message":"Invalid credentials"}}"#.to_vec(),
        });
        let client = RpcClient::new(broker, Duration::from_secs(1));

        let res: Result<serde_json::Value, _> = client.call("login", &()).await;
        match res {
            Err(RpcFailure::Domain(err)) => assert_eq!(err.kind, ErrorKind::Unauthorized),
            other => panic!("expected domain error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_call_times_out() {
        let client = RpcClient::new(Arc::new(StalledBroker), Duration::from_millis(20));

        let res: Result<serde_json::Value, _> = client.call("find_all_tasks", &()).await;
        assert!(matches!(res, Err(RpcFailure::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_call_rejects_malformed_reply() {
        let broker = Arc::new(FixedReplyBroker {
            reply: br#"{"unexpected":"shape"}"#.to_vec(),
        });
        let client = RpcClient::new(broker, Duration::from_secs(1));

        let res: Result<serde_json::Value, _> = client.call("find_one_task", &()).await;
        assert!(matches!(res, Err(RpcFailure::Decode(_))));
    }
}
