use anyhow::Result;
use common::{
    config::ServerConfig,
    database::{self, DatabaseConfig},
    jwt::{JwtConfig, JwtService},
    telemetry,
};
use std::sync::Arc;
use tracing::info;

mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod stripe;
mod validation;

use crate::{
    repositories::{CartItemRepository, OrderRepository, PizzaRepository},
    state::{AppState, Stores},
    stripe::{StripeConfig, StripeGateway},
};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let jwt_service = JwtService::new(JwtConfig::from_env()?);
    let gateway = StripeGateway::new(StripeConfig::from_env()?);

    // Initialize repositories
    let stores = Stores {
        pizzas: Arc::new(PizzaRepository::new(pool.clone())),
        cart_items: Arc::new(CartItemRepository::new(pool.clone())),
        orders: Arc::new(OrderRepository::new(pool)),
    };

    let app_state = AppState::new(stores, Arc::new(gateway), jwt_service);

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env("API", 3001)?;
    let listener = tokio::net::TcpListener::bind(server_config.bind_address()).await?;
    info!("API service listening on {}", server_config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
