//! Delivery Orders - API Server Binary
//!
//! This binary starts the HTTP API server for delivery orders.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin delivery-api
//!
//! # Run with environment variables
//! API_PORT=8080 API_DATABASE_URL=postgres://... API_DISTANCE_API_KEY=... cargo run --bin delivery-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` - PostgreSQL connection string (`DATABASE_URL` also accepted)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_DB_MAX_CONNECTIONS` / `API_DB_MIN_CONNECTIONS` - Pool bounds (default: 10 / 2)
//! * `API_DB_ACQUIRE_TIMEOUT_SECS` - Wait for a pooled connection (default: 30)
//! * `API_CLAIM_LOCK_TIMEOUT_MS` - Wait for an order's row lock when taking it (default: 5000)
//! * `API_DISTANCE_API_KEY` - Google Distance Matrix API key
//! * `API_DISTANCE_BASE_URL` - Maps API base URL
//! * `API_DISTANCE_TIMEOUT_SECS` - Distance lookup timeout (default: 10)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_orders::adapters::GoogleDistanceMatrix;
use domain_orders::OrderService;
use infra_db::{create_pool, run_migrations, OrderRepository, PgClaimEngine};
use interface_api::{config::ApiConfig, create_router};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, connects to the database,
/// applies the schema, wires the order service and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Delivery Orders API Server"
    );

    let db_config = config.database_config();
    let claim_lock_timeout = db_config.claim_lock_timeout;
    let pool = create_pool(db_config)
        .await
        .context("failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("failed to apply database schema")?;

    if config.distance_api_key.is_empty() {
        tracing::warn!("API_DISTANCE_API_KEY is not set; distance lookups will be rejected");
    }
    let distance = GoogleDistanceMatrix::new(config.distance_config())
        .context("failed to build distance client")?;

    let store = Arc::new(OrderRepository::new(pool.clone()));
    let claims = Arc::new(PgClaimEngine::new(pool.clone(), claim_lock_timeout));
    let service = OrderService::new(store, claims, Arc::new(distance));

    let app = create_router(service);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// Falls back to individual variables and defaults when the prefixed
/// configuration cannot be deserialized.
fn load_config() -> ApiConfig {
    let mut config = ApiConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid API_ configuration ({e}), falling back to defaults");
        let defaults = ApiConfig::default();
        ApiConfig {
            host: std::env::var("API_HOST").unwrap_or(defaults.host.clone()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            distance_api_key: std::env::var("API_DISTANCE_API_KEY")
                .unwrap_or(defaults.distance_api_key.clone()),
            ..defaults
        }
    });

    if std::env::var("API_DATABASE_URL").is_err() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
    }
    if std::env::var("API_LOG_LEVEL").is_err() {
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = level;
        }
    }

    config
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits, so no claim
/// transaction is cut off mid-flight.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
