pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::sea_time::handlers as sea_time;
use crate::state::AppState;
use crate::trust::handlers as trust;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sea-time ledger
        .route(
            "/api/v1/candidates/:id/sea-time",
            post(sea_time::handle_recompute_sea_time),
        )
        .route(
            "/api/v1/candidates/:id/sea-time/ledger",
            get(sea_time::handle_get_ledger),
        )
        // Compliance and trust profile
        .route(
            "/api/v1/candidates/:id/compliance",
            post(trust::handle_recompute_compliance),
        )
        .route(
            "/api/v1/candidates/:id/trust-profile",
            get(trust::handle_get_trust_profile),
        )
        .route("/api/v1/trust/recompute", post(trust::handle_batch_recompute))
        .with_state(state)
}
