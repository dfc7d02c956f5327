use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sea_time::operation_type::OperationType;
use crate::sea_time::overlap::OverlapCorrection;

const UNKNOWN_KEY: &str = "unknown";

/// Attributable days for one rank or vessel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayShare {
    pub key: String,
    pub days: i64,
    pub percentage: f64, // of total sea days, 1 decimal
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDays {
    pub sea: i64,
    pub river: i64,
}

/// Rolled-up sea time stored under the profile's `sea_time` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeaTimeSummary {
    pub batch_id: Option<Uuid>,
    pub computed_at: DateTime<Utc>,
    pub contract_count: usize,
    pub skipped_contracts: usize,
    pub total_raw_days: i64,
    pub total_sea_days: i64,
    pub merged_total_days: i64,
    pub overlap_days_removed: i64,
    pub by_rank: Vec<DayShare>,
    pub by_vessel_type: Vec<DayShare>,
    pub by_operation_type: OperationDays,
}

impl SeaTimeSummary {
    /// All-zero summary for a candidate without usable contracts.
    pub fn empty(computed_at: DateTime<Utc>) -> Self {
        Self {
            batch_id: None,
            computed_at,
            contract_count: 0,
            skipped_contracts: 0,
            total_raw_days: 0,
            total_sea_days: 0,
            merged_total_days: 0,
            overlap_days_removed: 0,
            by_rank: Vec::new(),
            by_vessel_type: Vec::new(),
            by_operation_type: OperationDays::default(),
        }
    }

    pub fn from_correction(
        correction: &OverlapCorrection,
        merged_total_days: i64,
        batch_id: Uuid,
        computed_at: DateTime<Utc>,
    ) -> Self {
        let entries = &correction.entries;
        let total_raw_days: i64 = entries.iter().map(|e| e.raw_days).sum();
        let total_sea_days = correction.total_calculated_days();

        let by_rank = day_shares(
            entries
                .iter()
                .map(|e| (e.rank_code.as_deref(), e.calculated_days)),
            total_sea_days,
        );
        let by_vessel_type = day_shares(
            entries
                .iter()
                .map(|e| (e.vessel_type.as_deref(), e.calculated_days)),
            total_sea_days,
        );

        let mut by_operation_type = OperationDays::default();
        for entry in entries {
            match entry.operation_type {
                OperationType::Sea => by_operation_type.sea += entry.calculated_days,
                OperationType::River => by_operation_type.river += entry.calculated_days,
            }
        }

        Self {
            batch_id: Some(batch_id),
            computed_at,
            contract_count: entries.len(),
            skipped_contracts: correction.skipped,
            total_raw_days,
            total_sea_days,
            merged_total_days,
            overlap_days_removed: total_raw_days - total_sea_days,
            by_rank,
            by_vessel_type,
            by_operation_type,
        }
    }
}

/// Groups days by key and sorts descending by days, then by key.
fn day_shares<'a>(
    items: impl Iterator<Item = (Option<&'a str>, i64)>,
    total: i64,
) -> Vec<DayShare> {
    let mut grouped: BTreeMap<String, i64> = BTreeMap::new();
    for (key, days) in items {
        let key = key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(UNKNOWN_KEY);
        *grouped.entry(key.to_string()).or_default() += days;
    }

    let mut shares: Vec<DayShare> = grouped
        .into_iter()
        .map(|(key, days)| DayShare {
            percentage: percentage_of(days, total),
            key,
            days,
        })
        .collect();
    shares.sort_by(|a, b| b.days.cmp(&a.days).then_with(|| a.key.cmp(&b.key)));
    shares
}

fn percentage_of(days: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    ((days as f64 / total as f64) * 1000.0).round() / 10.0
}
