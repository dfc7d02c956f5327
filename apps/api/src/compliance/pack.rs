use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compliance::recommendations::Recommendation;
use crate::compliance::score::SectionScore;
use crate::compliance::status::{ComplianceFlag, ComplianceStatus};

/// Snapshot stored under the profile's `compliance_pack` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompliancePack {
    pub score: u32,
    pub status: ComplianceStatus,
    pub breakdown: Vec<SectionScore>,
    pub available_sections: usize,
    pub flags: Vec<ComplianceFlag>,
    pub recommendations: Vec<Recommendation>,
    pub computed_at: DateTime<Utc>,
}
