//! Trust Engine: compliance pack computation for one candidate.
//!
//! Pipeline: score → status → recommendations → persist pack → audit event.
//! Every failure is caught at this boundary and returned as
//! `Outcome::Failed`, so a batch over many candidates keeps going.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::compliance::pack::CompliancePack;
use crate::compliance::recommendations::build_recommendations;
use crate::compliance::score::{compute_compliance_score, ComplianceInputs};
use crate::compliance::status::{resolve_status, RiskIndicators};
use crate::config::TrustFeatures;
use crate::store::{AuditSink, TrustStore};
use crate::trust::event::{TrustEvent, TrustEventType};
use crate::trust::outcome::{EngineError, Outcome, UnavailableReason};

pub struct TrustEngine {
    store: Arc<dyn TrustStore>,
    audit: Arc<dyn AuditSink>,
}

impl TrustEngine {
    pub fn new(store: Arc<dyn TrustStore>, audit: Arc<dyn AuditSink>) -> Self {
        Self { store, audit }
    }

    pub async fn compute(
        &self,
        features: &TrustFeatures,
        candidate_id: Uuid,
    ) -> Outcome<CompliancePack> {
        self.compute_at(features, candidate_id, Utc::now()).await
    }

    pub async fn compute_at(
        &self,
        features: &TrustFeatures,
        candidate_id: Uuid,
        now: DateTime<Utc>,
    ) -> Outcome<CompliancePack> {
        if !features.compliance {
            return Outcome::Unavailable(UnavailableReason::FeatureDisabled);
        }

        match self.run(candidate_id, now).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Compliance computation failed for candidate {candidate_id}: {e}");
                Outcome::Failed(e)
            }
        }
    }

    async fn run(
        &self,
        candidate_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Outcome<CompliancePack>, EngineError> {
        if !self.store.candidate_exists(candidate_id).await? {
            return Ok(Outcome::Unavailable(UnavailableReason::CandidateNotFound));
        }
        let Some(profile) = self.store.fetch_trust_profile(candidate_id).await? else {
            return Ok(Outcome::Unavailable(UnavailableReason::ProfileNotFound));
        };
        if profile.background_consistency_score.is_none() {
            debug!("Candidate {candidate_id} has no consistency baseline yet");
            return Ok(Outcome::Unavailable(
                UnavailableReason::MissingConsistencyBaseline,
            ));
        }

        let verifications = self
            .store
            .fetch_tracking_verifications(candidate_id)
            .await?;
        let inputs = ComplianceInputs::from_profile(&profile, &verifications);

        let Some(score) = compute_compliance_score(&inputs) else {
            debug!("Candidate {candidate_id} has too few compliance sections to score");
            return Ok(Outcome::Unavailable(UnavailableReason::InsufficientSections));
        };

        let resolution = resolve_status(&score, &RiskIndicators::from_profile(&profile));
        if resolution.has_critical() {
            warn!("Candidate {candidate_id} has critical compliance flags");
        }
        let recommendations = build_recommendations(&score);

        let pack = CompliancePack {
            score: score.score,
            status: resolution.status,
            breakdown: score.sections,
            available_sections: score.available_sections,
            flags: resolution.flags,
            recommendations,
            computed_at: now,
        };

        self.store.save_compliance_pack(candidate_id, &pack).await?;

        self.audit
            .append(&TrustEvent {
                candidate_id,
                event_type: TrustEventType::ComplianceComputed,
                payload: json!({
                    "score": pack.score,
                    "status": pack.status,
                    "available_sections": pack.available_sections,
                    "flag_count": pack.flags.len(),
                }),
                created_at: now,
            })
            .await?;

        info!(
            "Compliance pack for candidate {candidate_id}: score {} ({})",
            pack.score,
            pack.status.as_str()
        );
        Ok(Outcome::Computed(pack))
    }
}
