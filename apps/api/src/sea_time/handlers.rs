//! Axum route handlers for the sea-time ledger.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::sea_time::SeaTimeLogRow;
use crate::sea_time::summary::SeaTimeSummary;
use crate::state::AppState;
use crate::trust::outcome::RecomputeResponse;

#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    pub candidate_id: Uuid,
    pub total_calculated_days: i64,
    pub entries: Vec<SeaTimeLogRow>,
}

/// POST /api/v1/candidates/:id/sea-time
///
/// Rebuilds the candidate's sea-time ledger and returns the new summary.
pub async fn handle_recompute_sea_time(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<RecomputeResponse<SeaTimeSummary>>, AppError> {
    let outcome = state.sea_time.recompute(&state.features, candidate_id).await;
    Ok(Json(RecomputeResponse::from_outcome(candidate_id, outcome)?))
}

/// GET /api/v1/candidates/:id/sea-time/ledger
pub async fn handle_get_ledger(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<LedgerResponse>, AppError> {
    let entries = state.store.fetch_ledger(candidate_id).await?;
    Ok(Json(LedgerResponse {
        candidate_id,
        total_calculated_days: entries.iter().map(|e| e.calculated_days).sum(),
        entries,
    }))
}
