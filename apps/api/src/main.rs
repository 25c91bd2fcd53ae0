mod admin;
mod auth;
mod classes;
mod config;
mod content;
mod db;
mod engagement;
mod errors;
mod membership;
mod models;
mod routes;
mod state;
mod store;
mod trainers;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{GymStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gym API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;
    info!("Seat policy on cancel: {:?}", config.seat_policy);
    if config.identity_callback_secret.is_none() {
        warn!("IDENTITY_CALLBACK_SECRET not set; sign-in callback is disabled");
    }

    let state = AppState::new(store, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects to PostgreSQL when `DATABASE_URL` is set. Without it the service
/// still boots and every data procedure fails with an internal error.
async fn build_store(config: &Config) -> Result<Option<Arc<dyn GymStore>>> {
    let Some(url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set; starting without persistence");
        return Ok(None);
    };

    let pool = create_pool(url, config.database_max_connections).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
    }
    Ok(Some(Arc::new(PgStore::new(pool))))
}
