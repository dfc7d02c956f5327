mod compliance;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod sea_time;
mod state;
mod store;
mod trust;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::sea_time::SeaTimeCalculator;
use crate::state::AppState;
use crate::store::PgTrustStore;
use crate::trust::TrustEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CrewTrust API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and the trust store on top of it
    let pool = db::connect(&config).await?;
    let store = Arc::new(PgTrustStore::new(pool));

    let sea_time = Arc::new(SeaTimeCalculator::new(store.clone(), store.clone()));
    let engine = Arc::new(TrustEngine::new(store.clone(), store.clone()));
    info!(
        "Trust engine initialized (sea_time: {}, compliance: {})",
        config.features.sea_time, config.features.compliance
    );

    let state = AppState {
        store,
        sea_time,
        engine,
        features: config.features,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
