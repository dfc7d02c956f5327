use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One ledger line per contract per computation batch.
/// The whole set for a candidate is replaced on every recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SeaTimeLogRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub contract_id: Uuid,
    pub batch_id: Uuid,
    pub original_start: NaiveDate,
    pub original_end: Option<NaiveDate>,
    pub effective_start: NaiveDate,
    pub effective_end: NaiveDate,
    pub raw_days: i64,
    pub calculated_days: i64,
    pub overlap_deducted_days: i64,
    pub rank_code: Option<String>,
    pub vessel_type: Option<String>,
    pub operation_type: String,
    pub computed_at: DateTime<Utc>,
}
