//! Tasks service
//!
//! Owns the task domain: CRUD, comments and the audit trail. Serves its
//! commands over the broker and publishes a domain event after every
//! successful write so the notifications service can fan changes out.

mod events;
mod handlers;

use crate::handlers::TaskCommandHandler;
use core_config::nats::NatsConfig;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv, database::DatabaseConfig};
use domain_tasks::{PgTaskRepository, TaskService};
use eyre::Result;
use messaging::{EventPublisher, NatsBroker, Responder, subjects};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    info!("Starting tasks service");

    let database_config = DatabaseConfig::from_env()?;
    let nats_config = NatsConfig::from_env()?;

    let db = database::postgres::connect_with_retry(&database_config, None).await?;
    info!("Connected to PostgreSQL");

    let broker = Arc::new(NatsBroker::connect_with_name(&nats_config.url, "tasks-service").await?);
    info!(nats_url = %nats_config.url, "Connected to NATS");

    let service = TaskService::new(Arc::new(PgTaskRepository::new(db)));
    let publisher = EventPublisher::new(broker.clone(), "tasks-service");
    let handler = Arc::new(TaskCommandHandler::new(service, publisher));

    Responder::new(broker, subjects::TASKS_QUEUE_GROUP)
        .run(subjects::TASKS_COMMANDS, handler)
        .await
}
