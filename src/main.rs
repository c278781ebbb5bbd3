use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use carzone_api::{
    auth::{Credentials, TokenIssuer},
    config::Config,
    constants::API_NAME,
    handlers,
    repository::{CarRepository, EngineRepository},
    service::{CarService, EngineService},
    state::AppState,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("{} Starting CarZone API server on port {}", API_NAME, config.server_port);

    // One pool for the whole process, shared by every repository
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("{} Connected to database", API_NAME);

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("{} Database schema is up to date", API_NAME);

    let state = AppState {
        cars: CarService::new(Arc::new(CarRepository::new(pool.clone()))),
        engines: EngineService::new(Arc::new(EngineRepository::new(pool.clone()))),
        tokens: TokenIssuer::from_config(&config),
        credentials: Credentials::from_config(&config),
    };
    let app = handlers::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("{} Server listening on {}", API_NAME, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("{} Server shutdown complete", API_NAME);

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("{} Failed to listen for Ctrl+C: {}", API_NAME, e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("{} Failed to install SIGTERM handler: {}", API_NAME, e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("{} Received Ctrl+C, starting shutdown", API_NAME);
        }
        _ = terminate => {
            tracing::info!("{} Received SIGTERM, starting shutdown", API_NAME);
        }
    }
}
