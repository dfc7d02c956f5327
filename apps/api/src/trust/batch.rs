use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::TrustFeatures;
use crate::sea_time::SeaTimeCalculator;
use crate::trust::engine::TrustEngine;
use crate::trust::outcome::Outcome;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub computed: usize,
    pub unavailable: usize,
    pub failed: usize,
}

impl StageCounts {
    fn record<T>(&mut self, outcome: &Outcome<T>) {
        match outcome {
            Outcome::Computed(_) => self.computed += 1,
            Outcome::Unavailable(_) => self.unavailable += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateRun {
    pub candidate_id: Uuid,
    pub sea_time: &'static str,
    pub compliance: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub candidates: Vec<CandidateRun>,
    pub sea_time: StageCounts,
    pub compliance: StageCounts,
}

/// Rebuilds sea time, then the compliance pack, for each candidate in turn.
/// A failure for one candidate is recorded and the batch moves on.
pub async fn recompute_candidates(
    sea_time: &SeaTimeCalculator,
    engine: &TrustEngine,
    features: &TrustFeatures,
    candidate_ids: &[Uuid],
    now: DateTime<Utc>,
) -> BatchReport {
    let mut report = BatchReport::default();

    for &candidate_id in candidate_ids {
        let sea_outcome = sea_time.recompute_at(features, candidate_id, now).await;
        report.sea_time.record(&sea_outcome);

        let compliance_outcome = engine.compute_at(features, candidate_id, now).await;
        report.compliance.record(&compliance_outcome);

        report.candidates.push(CandidateRun {
            candidate_id,
            sea_time: sea_outcome.label(),
            compliance: compliance_outcome.label(),
        });
    }

    let failed = report.sea_time.failed + report.compliance.failed;
    if failed > 0 {
        warn!(
            "Trust batch finished with {failed} failed computations over {} candidates",
            candidate_ids.len()
        );
    } else {
        info!("Trust batch finished for {} candidates", candidate_ids.len());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::models::contract::ContractRow;
    use crate::store::memory::InMemoryTrustStore;
    use crate::trust::profile::{RankStcwDetail, TrustProfile};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 30, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_batch_continues_past_unavailable_candidates() {
        let store = Arc::new(InMemoryTrustStore::new());
        let calculator = SeaTimeCalculator::new(store.clone(), store.clone());
        let engine = TrustEngine::new(store.clone(), store.clone());

        let ready = Uuid::new_v4();
        let mut profile = TrustProfile::neutral(ready);
        profile.background_consistency_score = Some(82.0);
        profile.details.rank_stcw = Some(RankStcwDetail {
            rank_readiness_ratio: Some(0.9),
            certificate_compliance_ratio: Some(0.95),
            ..Default::default()
        });
        store.put_profile(profile);
        store.add_contract(ContractRow {
            id: Uuid::new_v4(),
            candidate_id: ready,
            vessel_id: None,
            rank_code: Some("2/O".to_string()),
            vessel_type: Some("container".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 9, 1),
            created_at: now(),
        });

        let unknown = Uuid::new_v4();

        let report = recompute_candidates(
            &calculator,
            &engine,
            &TrustFeatures::default(),
            &[unknown, ready],
            now(),
        )
        .await;

        assert_eq!(report.candidates.len(), 2);
        assert_eq!(report.candidates[0].sea_time, "unavailable");
        assert_eq!(report.candidates[0].compliance, "unavailable");
        assert_eq!(report.candidates[1].sea_time, "computed");
        assert_eq!(report.candidates[1].compliance, "computed");
        assert_eq!(
            report.compliance,
            StageCounts {
                computed: 1,
                unavailable: 1,
                failed: 0
            }
        );

        let stored = store.profile(ready).unwrap();
        assert!(stored.details.sea_time.is_some());
        assert!(stored.details.compliance_pack.is_some());
    }

    #[tokio::test]
    async fn test_batch_records_failures() {
        let store = Arc::new(InMemoryTrustStore::new());
        let calculator = SeaTimeCalculator::new(store.clone(), store.clone());
        let engine = TrustEngine::new(store.clone(), store.clone());
        let candidate = Uuid::new_v4();
        store.add_candidate(candidate);
        store.fail_writes();

        let report = recompute_candidates(
            &calculator,
            &engine,
            &TrustFeatures::default(),
            &[candidate],
            now(),
        )
        .await;

        assert_eq!(report.sea_time.failed, 1);
        assert_eq!(report.compliance.unavailable, 1);
    }
}
