use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::store::StoreError;

/// Result of one engine computation for one candidate.
///
/// `Unavailable` covers normal states of incomplete records and is never logged
/// as an error. `Failed` carries infrastructure or invariant failures.
#[derive(Debug)]
pub enum Outcome<T> {
    Computed(T),
    Unavailable(UnavailableReason),
    Failed(EngineError),
}

impl<T> Outcome<T> {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Computed(_) => "computed",
            Outcome::Unavailable(_) => "unavailable",
            Outcome::Failed(_) => "failed",
        }
    }

    #[cfg(test)]
    pub fn computed(self) -> Option<T> {
        match self {
            Outcome::Computed(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    FeatureDisabled,
    CandidateNotFound,
    ProfileNotFound,
    MissingConsistencyBaseline,
    InsufficientSections,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Sea-time ledger mismatch: {attributed} attributed days vs {union} union days")]
    LedgerMismatch { attributed: i64, union: i64 },
}

/// HTTP body for a recompute trigger.
#[derive(Debug, Serialize)]
pub struct RecomputeResponse<T> {
    pub candidate_id: Uuid,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailableReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> RecomputeResponse<T> {
    /// Failed outcomes become an `AppError` so the caller sees a 500.
    pub fn from_outcome(candidate_id: Uuid, outcome: Outcome<T>) -> Result<Self, AppError> {
        let status = outcome.label();
        match outcome {
            Outcome::Computed(result) => Ok(Self {
                candidate_id,
                status,
                reason: None,
                result: Some(result),
            }),
            Outcome::Unavailable(reason) => Ok(Self {
                candidate_id,
                status,
                reason: Some(reason),
                result: None,
            }),
            Outcome::Failed(err) => Err(AppError::Engine(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Outcome::Computed(1).label(), "computed");
        assert_eq!(
            Outcome::<u32>::Unavailable(UnavailableReason::FeatureDisabled).label(),
            "unavailable"
        );
        let failed: Outcome<u32> = Outcome::Failed(EngineError::LedgerMismatch {
            attributed: 1,
            union: 2,
        });
        assert_eq!(failed.label(), "failed");
        assert!(failed.computed().is_none());
    }

    #[test]
    fn test_response_from_unavailable() {
        let response = RecomputeResponse::<u32>::from_outcome(
            Uuid::nil(),
            Outcome::Unavailable(UnavailableReason::InsufficientSections),
        )
        .unwrap();
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["status"], "unavailable");
        assert_eq!(body["reason"], "insufficient_sections");
        assert!(body.get("result").is_none());
    }

    #[test]
    fn test_response_from_failed_is_error() {
        let result = RecomputeResponse::<u32>::from_outcome(
            Uuid::nil(),
            Outcome::Failed(EngineError::LedgerMismatch {
                attributed: 10,
                union: 11,
            }),
        );
        assert!(matches!(result, Err(AppError::Engine(_))));
    }
}
