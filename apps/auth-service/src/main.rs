//! Auth service
//!
//! Owns user identity: registration, credential verification, token issuance
//! and user lookups. Serves its commands over the broker with a queue group
//! so replicas load-balance.

mod handlers;

use crate::handlers::AuthCommandHandler;
use axum_helpers::JwtAuth;
use core_config::jwt::JwtConfig;
use core_config::nats::NatsConfig;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv, database::DatabaseConfig};
use domain_users::{PgUserRepository, UserService};
use eyre::Result;
use messaging::{NatsBroker, Responder, subjects};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    info!("Starting auth service");

    let database_config = DatabaseConfig::from_env()?;
    let nats_config = NatsConfig::from_env()?;
    let jwt_config = JwtConfig::from_env()?;

    let db = database::postgres::connect_with_retry(&database_config, None).await?;
    info!("Connected to PostgreSQL");

    let broker = Arc::new(NatsBroker::connect_with_name(&nats_config.url, "auth-service").await?);
    info!(nats_url = %nats_config.url, "Connected to NATS");

    let service = UserService::new(PgUserRepository::new(db), JwtAuth::new(&jwt_config));
    let handler = Arc::new(AuthCommandHandler::new(service));

    Responder::new(broker, subjects::AUTH_QUEUE_GROUP)
        .run(subjects::AUTH_COMMANDS, handler)
        .await
}
