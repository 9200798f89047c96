//! Film Catalog Server - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Assemble the database URI and create the connection pool
//! 3. Run database migrations
//! 4. Wire services into the application state
//! 5. Build the HTTP router and start serving

use film_catalog_server::{app, config, db};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Application initialization");

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded, PORT={}", config.port);

    let pool = db::create_pool(&config.database_url()?).await?;
    tracing::info!("Database connection established");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let addr = config.bind_address();
    let server_url = config.server_url();

    let state = app::AppState::new(config, pool);
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server started on {}", server_url);

    axum::serve(listener, router).await?;

    Ok(())
}
