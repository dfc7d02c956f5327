use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrustProfileRow {
    pub candidate_id: Uuid,
    pub background_consistency_score: Option<f64>,
    pub stability_index: Option<f64>,
    pub risk_score: Option<f64>,
    pub risk_tier: Option<String>,
    pub rank_anomaly_flag: bool,
    pub details: Value,
    pub compliance_score: Option<i32>,
    pub compliance_status: Option<String>,
    pub compliance_computed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
