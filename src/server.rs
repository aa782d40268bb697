//! HTTP server initialization and runtime setup.
//!
//! Builds the location store and geocoder once, shares them through
//! [`AppState`], and runs the Axum server until a shutdown signal arrives.

use crate::config::{CacheBackend, Config};
use crate::domain::geocoder::Geocoder;
use crate::domain::repositories::LocationRepository;
use crate::infrastructure::cache::{MemoryLocationStore, RedisLocationStore};
use crate::infrastructure::geocoding::GoogleGeocoder;
use crate::infrastructure::persistence::PgLocationRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The configured location store (PostgreSQL with migrations, Redis, or memory)
/// - The Google Maps geocoder
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The store connection or migrations fail
/// - The HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = connect_store(&config).await?;

    if config.google_maps_api_key.is_none() {
        tracing::error!(
            "GOOGLE_MAPS_API_KEY is not set; uncached lookups will be rejected by the geocoding API"
        );
    }

    let geocoder: Arc<dyn Geocoder> = Arc::new(
        GoogleGeocoder::new(
            config.google_maps_api_key.clone(),
            config.geocoder_base_url.clone(),
            config.geocoder_timeout(),
        )
        .context("Failed to build geocoding HTTP client")?,
    );

    let state = AppState::new(repository, geocoder);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connects the location store selected by `CACHE_BACKEND`.
async fn connect_store(config: &Config) -> Result<Arc<dyn LocationRepository>> {
    match config.cache_backend {
        CacheBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
                .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            Ok(Arc::new(PgLocationRepository::new(Arc::new(pool))))
        }
        CacheBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL must be set for the redis backend")?;

            let store = RedisLocationStore::connect(redis_url)
                .await
                .context("Failed to connect to Redis")?;

            Ok(Arc::new(store))
        }
        CacheBackend::Memory => {
            tracing::warn!("Using in-memory location store; cached locations are lost on restart");
            Ok(Arc::new(MemoryLocationStore::new()))
        }
    }
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
