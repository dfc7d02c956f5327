use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::compliance::pack::CompliancePack;
use crate::models::contract::{ContractRow, TrackingVerificationRow};
use crate::models::sea_time::SeaTimeLogRow;
use crate::sea_time::summary::SeaTimeSummary;
use crate::store::{AuditSink, StoreError, TrustStore};
use crate::trust::event::TrustEvent;
use crate::trust::profile::TrustProfile;

/// In-process store for exercising the engine without PostgreSQL.
#[derive(Default)]
pub struct InMemoryTrustStore {
    candidates: Mutex<HashSet<Uuid>>,
    contracts: Mutex<Vec<ContractRow>>,
    verifications: Mutex<Vec<TrackingVerificationRow>>,
    profiles: Mutex<HashMap<Uuid, TrustProfile>>,
    ledger: Mutex<HashMap<Uuid, Vec<SeaTimeLogRow>>>,
    events: Mutex<Vec<TrustEvent>>,
    fail_writes: AtomicBool,
}

impl InMemoryTrustStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_candidate(&self, candidate_id: Uuid) {
        self.candidates.lock().unwrap().insert(candidate_id);
    }

    pub fn add_contract(&self, contract: ContractRow) {
        self.candidates.lock().unwrap().insert(contract.candidate_id);
        self.contracts.lock().unwrap().push(contract);
    }

    pub fn add_verification(&self, verification: TrackingVerificationRow) {
        self.verifications.lock().unwrap().push(verification);
    }

    pub fn put_profile(&self, profile: TrustProfile) {
        self.candidates.lock().unwrap().insert(profile.candidate_id);
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.candidate_id, profile);
    }

    pub fn profile(&self, candidate_id: Uuid) -> Option<TrustProfile> {
        self.profiles.lock().unwrap().get(&candidate_id).cloned()
    }

    pub fn ledger(&self, candidate_id: Uuid) -> Vec<SeaTimeLogRow> {
        self.ledger
            .lock()
            .unwrap()
            .get(&candidate_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn events(&self) -> Vec<TrustEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Makes every subsequent write fail like a dropped database connection.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl TrustStore for InMemoryTrustStore {
    async fn candidate_exists(&self, candidate_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.candidates.lock().unwrap().contains(&candidate_id))
    }

    async fn fetch_contracts(&self, candidate_id: Uuid) -> Result<Vec<ContractRow>, StoreError> {
        let mut contracts: Vec<ContractRow> = self
            .contracts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.candidate_id == candidate_id && c.start_date.is_some())
            .cloned()
            .collect();
        contracts.sort_by_key(|c| c.start_date);
        Ok(contracts)
    }

    async fn fetch_tracking_verifications(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<TrackingVerificationRow>, StoreError> {
        let contract_ids: HashSet<Uuid> = self
            .contracts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.candidate_id == candidate_id)
            .map(|c| c.id)
            .collect();
        Ok(self
            .verifications
            .lock()
            .unwrap()
            .iter()
            .filter(|v| contract_ids.contains(&v.contract_id))
            .cloned()
            .collect())
    }

    async fn fetch_trust_profile(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<TrustProfile>, StoreError> {
        Ok(self.profile(candidate_id))
    }

    async fn fetch_ledger(&self, candidate_id: Uuid) -> Result<Vec<SeaTimeLogRow>, StoreError> {
        Ok(self.ledger(candidate_id))
    }

    async fn replace_sea_time(
        &self,
        candidate_id: Uuid,
        entries: &[SeaTimeLogRow],
        summary: &SeaTimeSummary,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        self.ledger
            .lock()
            .unwrap()
            .insert(candidate_id, entries.to_vec());
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .entry(candidate_id)
            .or_insert_with(|| TrustProfile::neutral(candidate_id));
        profile.details.sea_time = Some(summary.clone());
        Ok(())
    }

    async fn save_compliance_pack(
        &self,
        candidate_id: Uuid,
        pack: &CompliancePack,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .entry(candidate_id)
            .or_insert_with(|| TrustProfile::neutral(candidate_id));
        profile.compliance_score = Some(pack.score);
        profile.compliance_status = Some(pack.status);
        profile.compliance_computed_at = Some(pack.computed_at);
        profile.details.compliance_pack = Some(pack.clone());
        Ok(())
    }
}

#[async_trait]
impl AuditSink for InMemoryTrustStore {
    async fn append(&self, event: &TrustEvent) -> Result<(), StoreError> {
        self.check_writable()?;
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
