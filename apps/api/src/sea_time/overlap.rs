//! Overlap correction for a candidate's employment intervals.
//!
//! Two independent paths over the same contracts:
//! - `correct_overlaps` walks the intervals chronologically and attributes each
//!   calendar day to the first contract that covers it.
//! - `merged_total_days` computes the plain union of the intervals.
//!
//! The sum of attributed days from the first must always equal the second.
//! Day counts are inclusive of both the start and the end date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::models::contract::ContractRow;
use crate::sea_time::operation_type::{classify_operation_type, OperationType};

/// A contract after overlap correction. One per valid input contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectedInterval {
    pub contract_id: Uuid,
    pub vessel_id: Option<Uuid>,
    pub rank_code: Option<String>,
    pub vessel_type: Option<String>,
    pub operation_type: OperationType,
    pub original_start: NaiveDate,
    pub original_end: Option<NaiveDate>,
    pub effective_start: NaiveDate,
    pub effective_end: NaiveDate,
    pub raw_days: i64,
    pub calculated_days: i64,
    pub overlap_deducted_days: i64,
}

#[derive(Debug, Clone, Default)]
pub struct OverlapCorrection {
    pub entries: Vec<CorrectedInterval>,
    pub skipped: usize,
}

impl OverlapCorrection {
    pub fn total_calculated_days(&self) -> i64 {
        self.entries.iter().map(|e| e.calculated_days).sum()
    }
}

/// Inclusive day count between two dates.
pub fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Resolves a contract to a concrete `[start, end]` range.
/// Open contracts run until `today`. Returns `None` for contracts that must be
/// skipped: no start date, or start after end.
fn resolve_span(contract: &ContractRow, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let start = contract.start_date?;
    let end = contract.end_date.unwrap_or(today);
    if start > end || span_days(start, end) <= 0 {
        return None;
    }
    Some((start, end))
}

/// Single forward sweep over the contracts ordered by start date.
///
/// Contracts sharing a start date keep their input order, so the earlier one in
/// the input absorbs the shared days. A later contract never reclaims days
/// already attributed to an earlier one.
pub fn correct_overlaps(contracts: &[ContractRow], today: NaiveDate) -> OverlapCorrection {
    let mut ordered: Vec<&ContractRow> = contracts.iter().collect();
    ordered.sort_by_key(|c| c.start_date);

    let mut correction = OverlapCorrection::default();
    let mut covered_up_to: Option<NaiveDate> = None;

    for contract in ordered {
        let Some((start, end)) = resolve_span(contract, today) else {
            debug!(
                "Skipping contract {} with invalid range ({:?} to {:?})",
                contract.id, contract.start_date, contract.end_date
            );
            correction.skipped += 1;
            continue;
        };

        let raw_days = span_days(start, end);

        let (effective_start, effective_end, calculated_days) = match covered_up_to {
            Some(covered) if start <= covered => match covered.succ_opt() {
                Some(next) if next <= end => (next, end, span_days(next, end)),
                // Fully subsumed by earlier coverage.
                _ => (start, end, 0),
            },
            _ => (start, end, raw_days),
        };

        covered_up_to = Some(covered_up_to.map_or(end, |covered| covered.max(end)));

        correction.entries.push(CorrectedInterval {
            contract_id: contract.id,
            vessel_id: contract.vessel_id,
            rank_code: contract.rank_code.clone(),
            vessel_type: contract.vessel_type.clone(),
            operation_type: classify_operation_type(contract.vessel_type.as_deref()),
            original_start: start,
            original_end: contract.end_date,
            effective_start,
            effective_end,
            raw_days,
            calculated_days,
            overlap_deducted_days: raw_days - calculated_days,
        });
    }

    correction
}

/// Day count of the union of all valid contract ranges.
/// Overlapping and adjacent ranges are merged before summing.
pub fn merged_total_days(contracts: &[ContractRow], today: NaiveDate) -> i64 {
    let mut spans: Vec<(NaiveDate, NaiveDate)> = contracts
        .iter()
        .filter_map(|c| resolve_span(c, today))
        .collect();
    spans.sort();

    let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some((_, last_end)) if start <= last_end.succ_opt().unwrap_or(*last_end) => {
                if end > *last_end {
                    *last_end = end;
                }
            }
            _ => merged.push((start, end)),
        }
    }

    merged.iter().map(|(s, e)| span_days(*s, *e)).sum()
}
