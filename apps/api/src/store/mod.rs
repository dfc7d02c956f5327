//! Persistence seam for the trust engine.
//!
//! `PgTrustStore` backs both traits in production. Tests run the engine against
//! the in-memory store instead.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::compliance::pack::CompliancePack;
use crate::models::contract::{ContractRow, TrackingVerificationRow};
use crate::models::sea_time::SeaTimeLogRow;
use crate::sea_time::summary::SeaTimeSummary;
use crate::trust::event::TrustEvent;
use crate::trust::profile::TrustProfile;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgTrustStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Read access to contracts and tracking data, read/write access to the
/// per-candidate trust profile and sea-time ledger.
#[async_trait]
pub trait TrustStore: Send + Sync {
    async fn candidate_exists(&self, candidate_id: Uuid) -> Result<bool, StoreError>;

    /// Contracts with a known start date, ascending by start. Ties keep
    /// insertion order.
    async fn fetch_contracts(&self, candidate_id: Uuid) -> Result<Vec<ContractRow>, StoreError>;

    async fn fetch_tracking_verifications(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<TrackingVerificationRow>, StoreError>;

    async fn fetch_trust_profile(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<TrustProfile>, StoreError>;

    async fn fetch_ledger(&self, candidate_id: Uuid) -> Result<Vec<SeaTimeLogRow>, StoreError>;

    /// Swaps the candidate's whole ledger for `entries` and writes the
    /// `sea_time` key (creating the profile if needed) as one unit of work.
    async fn replace_sea_time(
        &self,
        candidate_id: Uuid,
        entries: &[SeaTimeLogRow],
        summary: &SeaTimeSummary,
    ) -> Result<(), StoreError>;

    /// Writes the `compliance_pack` key and mirrors score/status/timestamp
    /// into the top-level columns.
    async fn save_compliance_pack(
        &self,
        candidate_id: Uuid,
        pack: &CompliancePack,
    ) -> Result<(), StoreError>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, event: &TrustEvent) -> Result<(), StoreError>;
}
