//! User identity domain: registration, credential verification, token
//! issuance, and password-free user projections.

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, User,
    UserResponse,
};
pub use postgres::PgUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
