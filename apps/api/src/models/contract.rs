use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Employment contract as recorded by the crewing side. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContractRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub vessel_id: Option<Uuid>,
    pub rank_code: Option<String>,
    pub vessel_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Vessel-tracking verification of a contract, written by the ingestion subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrackingVerificationRow {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub status: String,
    pub confidence: Option<f64>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl TrackingVerificationRow {
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }
}
