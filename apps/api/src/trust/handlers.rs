//! Axum route handlers for compliance packs and trust profiles.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::compliance::pack::CompliancePack;
use crate::errors::AppError;
use crate::state::AppState;
use crate::trust::batch::{recompute_candidates, BatchReport};
use crate::trust::outcome::RecomputeResponse;
use crate::trust::profile::TrustProfile;

const MAX_BATCH_CANDIDATES: usize = 500;

#[derive(Debug, Deserialize)]
pub struct BatchRecomputeRequest {
    pub candidate_ids: Vec<Uuid>,
}

/// POST /api/v1/candidates/:id/compliance
pub async fn handle_recompute_compliance(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<RecomputeResponse<CompliancePack>>, AppError> {
    let outcome = state.engine.compute(&state.features, candidate_id).await;
    Ok(Json(RecomputeResponse::from_outcome(candidate_id, outcome)?))
}

/// GET /api/v1/candidates/:id/trust-profile
pub async fn handle_get_trust_profile(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<TrustProfile>, AppError> {
    let profile = state
        .store
        .fetch_trust_profile(candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trust profile for {candidate_id} not found")))?;
    Ok(Json(profile))
}

/// POST /api/v1/trust/recompute
///
/// Recomputes sea time and compliance for each listed candidate. Per-candidate
/// failures are reported in the body, not as an HTTP error.
pub async fn handle_batch_recompute(
    State(state): State<AppState>,
    Json(request): Json<BatchRecomputeRequest>,
) -> Result<Json<BatchReport>, AppError> {
    if request.candidate_ids.is_empty() {
        return Err(AppError::Validation(
            "candidate_ids cannot be empty".to_string(),
        ));
    }
    if request.candidate_ids.len() > MAX_BATCH_CANDIDATES {
        return Err(AppError::Validation(format!(
            "At most {MAX_BATCH_CANDIDATES} candidates per batch"
        )));
    }

    let report = recompute_candidates(
        &state.sea_time,
        &state.engine,
        &state.features,
        &request.candidate_ids,
        Utc::now(),
    )
    .await;
    Ok(Json(report))
}
