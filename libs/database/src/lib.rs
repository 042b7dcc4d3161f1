//! PostgreSQL connection management for the task services.

pub mod postgres;

pub use sea_orm::{DatabaseConnection, DbErr};
