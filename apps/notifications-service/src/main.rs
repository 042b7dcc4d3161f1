//! Notifications service
//!
//! Bridges task lifecycle events from the broker to connected websocket
//! clients. Delivery is best-effort: a client only sees events published
//! while it is connected.

mod relay;
mod ws;

use crate::relay::EventRelay;
use core_config::nats::NatsConfig;
use core_config::server::ServerConfig;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv, app_info};
use eyre::Result;
use messaging::NatsBroker;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Frames buffered per lagging websocket client before events are dropped.
const BROADCAST_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    info!("Starting notifications service");

    let nats_config = NatsConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;

    let broker =
        Arc::new(NatsBroker::connect_with_name(&nats_config.url, "notifications-service").await?);
    info!(nats_url = %nats_config.url, "Connected to NATS");

    let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
    let relay = EventRelay::new(broker, tx.clone());

    let router = axum::Router::new()
        .merge(axum_helpers::health_router(app_info!()))
        .merge(ws::ws_router(tx))
        .layer(TraceLayer::new_for_http());

    tokio::select! {
        result = relay.run() => result?,
        result = axum_helpers::create_app(router, &server_config) => result?,
    }

    Ok(())
}
