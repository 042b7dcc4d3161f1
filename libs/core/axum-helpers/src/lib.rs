//! # Axum Helpers
//!
//! Utilities, middleware, and helpers shared by the HTTP-facing services.
//!
//! ## Modules
//!
//! - **[`auth`]**: stateless JWT issuing/verification and the `AuthUser` extractor
//! - **[`server`]**: server setup, health checks, graceful shutdown
//! - **[`http`]**: CORS layers
//! - **[`errors`]**: structured error responses
//! - **[`extractors`]**: custom extractors (UUID path, validated JSON)

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export auth types
pub use auth::{ACCESS_TOKEN_TTL, AuthUser, JwtAuth, JwtClaims, REFRESH_TOKEN_TTL, TokenPair};

// Re-export server types
pub use server::{HealthResponse, create_app, create_router, health_router, shutdown_signal};

// Re-export HTTP middleware
pub use http::create_cors_layer;

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson};
