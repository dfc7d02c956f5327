//! Sea-Time Calculator: full rebuild of a candidate's sea-time ledger.
//!
//! Every run regenerates the ledger from the contracts, replaces the previous
//! batch in one transaction, and stores the rolled-up summary on the trust
//! profile. There is no incremental path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::TrustFeatures;
use crate::models::sea_time::SeaTimeLogRow;
use crate::sea_time::overlap::{correct_overlaps, merged_total_days, OverlapCorrection};
use crate::sea_time::summary::SeaTimeSummary;
use crate::store::{AuditSink, TrustStore};
use crate::trust::event::{TrustEvent, TrustEventType};
use crate::trust::outcome::{EngineError, Outcome, UnavailableReason};

pub struct SeaTimeCalculator {
    store: Arc<dyn TrustStore>,
    audit: Arc<dyn AuditSink>,
}

impl SeaTimeCalculator {
    pub fn new(store: Arc<dyn TrustStore>, audit: Arc<dyn AuditSink>) -> Self {
        Self { store, audit }
    }

    pub async fn recompute(
        &self,
        features: &TrustFeatures,
        candidate_id: Uuid,
    ) -> Outcome<SeaTimeSummary> {
        self.recompute_at(features, candidate_id, Utc::now()).await
    }

    /// Rebuilds the ledger as of `now`. Open contracts run until `now`'s date.
    /// Failures are logged here and returned as `Outcome::Failed`, never raised.
    pub async fn recompute_at(
        &self,
        features: &TrustFeatures,
        candidate_id: Uuid,
        now: DateTime<Utc>,
    ) -> Outcome<SeaTimeSummary> {
        if !features.sea_time {
            return Outcome::Unavailable(UnavailableReason::FeatureDisabled);
        }

        match self.rebuild(candidate_id, now).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Sea-time computation failed for candidate {candidate_id}: {e}");
                Outcome::Failed(e)
            }
        }
    }

    async fn rebuild(
        &self,
        candidate_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Outcome<SeaTimeSummary>, EngineError> {
        if !self.store.candidate_exists(candidate_id).await? {
            return Ok(Outcome::Unavailable(UnavailableReason::CandidateNotFound));
        }

        let contracts = self.store.fetch_contracts(candidate_id).await?;

        if contracts.is_empty() {
            let summary = SeaTimeSummary::empty(now);
            self.store
                .replace_sea_time(candidate_id, &[], &summary)
                .await?;
            info!("No contracts for candidate {candidate_id}; sea-time ledger cleared");
            return Ok(Outcome::Computed(summary));
        }

        let today = now.date_naive();
        let correction = correct_overlaps(&contracts, today);
        let union = merged_total_days(&contracts, today);

        let attributed = correction.total_calculated_days();
        if attributed != union {
            return Err(EngineError::LedgerMismatch { attributed, union });
        }

        let batch_id = Uuid::new_v4();
        let rows = ledger_rows(candidate_id, &correction, batch_id, now);
        let summary = SeaTimeSummary::from_correction(&correction, union, batch_id, now);
        self.store
            .replace_sea_time(candidate_id, &rows, &summary)
            .await?;

        self.audit
            .append(&TrustEvent {
                candidate_id,
                event_type: TrustEventType::SeaTimeComputed,
                payload: json!({
                    "batch_id": batch_id,
                    "contracts": summary.contract_count,
                    "skipped": summary.skipped_contracts,
                    "total_raw_days": summary.total_raw_days,
                    "total_sea_days": summary.total_sea_days,
                    "overlap_days_removed": summary.overlap_days_removed,
                }),
                created_at: now,
            })
            .await?;

        info!(
            "Sea time rebuilt for candidate {candidate_id}: {} days over {} contracts (batch {batch_id})",
            summary.total_sea_days, summary.contract_count
        );
        Ok(Outcome::Computed(summary))
    }
}

fn ledger_rows(
    candidate_id: Uuid,
    correction: &OverlapCorrection,
    batch_id: Uuid,
    computed_at: DateTime<Utc>,
) -> Vec<SeaTimeLogRow> {
    correction
        .entries
        .iter()
        .map(|entry| SeaTimeLogRow {
            id: Uuid::new_v4(),
            candidate_id,
            contract_id: entry.contract_id,
            batch_id,
            original_start: entry.original_start,
            original_end: entry.original_end,
            effective_start: entry.effective_start,
            effective_end: entry.effective_end,
            raw_days: entry.raw_days,
            calculated_days: entry.calculated_days,
            overlap_deducted_days: entry.overlap_deducted_days,
            rank_code: entry.rank_code.clone(),
            vessel_type: entry.vessel_type.clone(),
            operation_type: entry.operation_type.as_str().to_string(),
            computed_at,
        })
        .collect()
}
