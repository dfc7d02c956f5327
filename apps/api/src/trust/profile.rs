use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::compliance::pack::CompliancePack;
use crate::compliance::status::ComplianceStatus;
use crate::models::trust_profile::TrustProfileRow;
use crate::sea_time::summary::SeaTimeSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Unknown tiers are treated as absent.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskTier::Low),
            "medium" => Some(RiskTier::Medium),
            "high" => Some(RiskTier::High),
            "critical" => Some(RiskTier::Critical),
            _ => None,
        }
    }
}

/// Rank/STCW certification detail produced upstream. Read, never written, here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankStcwDetail {
    #[serde(default)]
    pub rank_readiness_ratio: Option<f64>,
    #[serde(default)]
    pub certificate_compliance_ratio: Option<f64>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub missing_certificates: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub expired_certificates: u32,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

/// Namespaced sub-results stored in the profile's detail document.
/// Keys owned by other subsystems are carried through untouched in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrustProfileDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sea_time: Option<SeaTimeSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_stcw: Option<RankStcwDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_pack: Option<CompliancePack>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-candidate aggregate of derived risk, sea-time and compliance indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustProfile {
    pub candidate_id: Uuid,
    pub background_consistency_score: Option<f64>,
    pub stability_index: Option<f64>,
    pub risk_score: Option<f64>,
    pub risk_tier: Option<RiskTier>,
    pub rank_anomaly_flag: bool,
    pub details: TrustProfileDetails,
    pub compliance_score: Option<u32>,
    pub compliance_status: Option<ComplianceStatus>,
    pub compliance_computed_at: Option<DateTime<Utc>>,
}

impl TrustProfile {
    /// Profile created lazily on first computation.
    pub fn neutral(candidate_id: Uuid) -> Self {
        Self {
            candidate_id,
            background_consistency_score: None,
            stability_index: None,
            risk_score: None,
            risk_tier: None,
            rank_anomaly_flag: false,
            details: TrustProfileDetails::default(),
            compliance_score: None,
            compliance_status: None,
            compliance_computed_at: None,
        }
    }

    pub fn rank_stcw(&self) -> Option<&RankStcwDetail> {
        self.details.rank_stcw.as_ref()
    }
}

impl TryFrom<TrustProfileRow> for TrustProfile {
    type Error = serde_json::Error;

    fn try_from(row: TrustProfileRow) -> Result<Self, Self::Error> {
        let details = if row.details.is_null() {
            TrustProfileDetails::default()
        } else {
            serde_json::from_value(row.details)?
        };

        Ok(Self {
            candidate_id: row.candidate_id,
            background_consistency_score: row.background_consistency_score,
            stability_index: row.stability_index,
            risk_score: row.risk_score,
            risk_tier: row.risk_tier.as_deref().and_then(RiskTier::parse),
            rank_anomaly_flag: row.rank_anomaly_flag,
            details,
            compliance_score: row.compliance_score.and_then(|s| u32::try_from(s).ok()),
            compliance_status: row.compliance_status.as_deref().and_then(ComplianceStatus::parse),
            compliance_computed_at: row.compliance_computed_at,
        })
    }
}
