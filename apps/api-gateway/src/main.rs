//! API gateway
//!
//! The single HTTP entry point. Verifies access tokens locally, forwards
//! each request as one broker command to the owning service, and translates
//! the tagged reply envelope into HTTP responses.

mod api;
mod error;
mod openapi;
mod state;

use axum_helpers::{JwtAuth, create_app, create_router, health_router};
use core_config::jwt::JwtConfig;
use core_config::nats::NatsConfig;
use core_config::server::ServerConfig;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv, app_info};
use eyre::Result;
use messaging::{NatsBroker, RpcClient};
use state::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    info!("Starting API gateway");

    let nats_config = NatsConfig::from_env()?;
    let jwt_config = JwtConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;

    let broker = Arc::new(NatsBroker::connect_with_name(&nats_config.url, "api-gateway").await?);
    info!(nats_url = %nats_config.url, "Connected to NATS");

    let state = AppState::new(
        RpcClient::new(broker, nats_config.request_timeout),
        JwtAuth::new(&jwt_config),
    );

    let api_routes = api::routes(state);
    let router =
        create_router::<openapi::ApiDoc>(api_routes).merge(health_router(app_info!()));

    create_app(router, &server_config).await?;

    info!("API gateway shutdown complete");
    Ok(())
}
