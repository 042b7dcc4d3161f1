//! Server infrastructure module.
//!
//! Application setup with OpenAPI documentation, health endpoints, and
//! graceful shutdown.

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_app, create_router};
pub use health::{HealthResponse, health_router};
pub use shutdown::shutdown_signal;
