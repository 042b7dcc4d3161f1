//! Messaging abstraction layer for the task-management services.
//!
//! Provides a trait-based abstraction over the broker so services and tests
//! can swap the NATS implementation for an in-memory one:
//! - **Request/Reply**: synchronous command dispatch (gateway -> service)
//! - **Pub/Sub**: fire-and-forget domain events (service -> notifications)
//!
//! Replies travel in an explicit tagged envelope ([`RpcReply`]) so the
//! gateway translates domain errors into HTTP statuses deterministically
//! instead of pattern-matching on loosely-typed failures.

mod broker;
mod events;
mod nats;
mod responder;
mod rpc;
pub mod subjects;

pub use broker::{MessageBroker, MessageStream, ReceivedMessage};
pub use events::EventPublisher;
pub use nats::NatsBroker;
pub use responder::{CommandHandler, Responder};
pub use rpc::{ErrorKind, RpcClient, RpcError, RpcFailure, RpcReply};
