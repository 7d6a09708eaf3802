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
mod password;
mod repositories;
mod routes;
mod services;
mod state;
mod validation;

use crate::{
    password::{HashingConfig, PasswordService},
    repositories::UserRepository,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    info!("Starting authentication service");

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
    let password_service = PasswordService::new(&HashingConfig::from_env())?;
    let user_repository = Arc::new(UserRepository::new(pool));

    let app_state = AppState::new(user_repository, password_service, jwt_service);

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env("AUTH", 3000)?;
    let listener = tokio::net::TcpListener::bind(server_config.bind_address()).await?;
    info!("Authentication service listening on {}", server_config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
