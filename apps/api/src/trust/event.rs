use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustEventType {
    SeaTimeComputed,
    ComplianceComputed,
}

impl TrustEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustEventType::SeaTimeComputed => "sea_time_computed",
            TrustEventType::ComplianceComputed => "compliance_computed",
        }
    }
}

/// Audit event carrying a compact payload, appended once per computation.
#[derive(Debug, Clone, Serialize)]
pub struct TrustEvent {
    pub candidate_id: Uuid,
    pub event_type: TrustEventType,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}
