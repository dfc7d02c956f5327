use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::compliance::pack::CompliancePack;
use crate::models::contract::{ContractRow, TrackingVerificationRow};
use crate::models::sea_time::SeaTimeLogRow;
use crate::models::trust_profile::TrustProfileRow;
use crate::sea_time::summary::SeaTimeSummary;
use crate::store::{AuditSink, StoreError, TrustStore};
use crate::trust::event::TrustEvent;
use crate::trust::profile::TrustProfile;

/// PostgreSQL-backed store. Detail-document writes merge a single key with
/// `||` so keys owned by other subsystems are left alone.
#[derive(Clone)]
pub struct PgTrustStore {
    pool: PgPool,
}

impl PgTrustStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrustStore for PgTrustStore {
    async fn candidate_exists(&self, candidate_id: Uuid) -> Result<bool, StoreError> {
        Ok(
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM candidates WHERE id = $1)")
                .bind(candidate_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn fetch_contracts(&self, candidate_id: Uuid) -> Result<Vec<ContractRow>, StoreError> {
        Ok(sqlx::query_as::<_, ContractRow>(
            r#"
            SELECT id, candidate_id, vessel_id, rank_code, vessel_type,
                   start_date, end_date, created_at
            FROM contracts
            WHERE candidate_id = $1 AND start_date IS NOT NULL
            ORDER BY start_date ASC, created_at ASC, id ASC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn fetch_tracking_verifications(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<TrackingVerificationRow>, StoreError> {
        Ok(sqlx::query_as::<_, TrackingVerificationRow>(
            r#"
            SELECT tv.id, tv.contract_id, tv.status, tv.confidence, tv.verified_at
            FROM tracking_verifications tv
            JOIN contracts c ON c.id = tv.contract_id
            WHERE c.candidate_id = $1
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn fetch_trust_profile(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<TrustProfile>, StoreError> {
        let row: Option<TrustProfileRow> =
            sqlx::query_as("SELECT * FROM trust_profiles WHERE candidate_id = $1")
                .bind(candidate_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(TrustProfile::try_from).transpose()?)
    }

    async fn fetch_ledger(&self, candidate_id: Uuid) -> Result<Vec<SeaTimeLogRow>, StoreError> {
        Ok(sqlx::query_as::<_, SeaTimeLogRow>(
            r#"
            SELECT * FROM sea_time_log
            WHERE candidate_id = $1
            ORDER BY original_start ASC, effective_start ASC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn replace_sea_time(
        &self,
        candidate_id: Uuid,
        entries: &[SeaTimeLogRow],
        summary: &SeaTimeSummary,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(summary)?;
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM sea_time_log WHERE candidate_id = $1")
            .bind(candidate_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO sea_time_log
                    (id, candidate_id, contract_id, batch_id, original_start, original_end,
                     effective_start, effective_end, raw_days, calculated_days,
                     overlap_deducted_days, rank_code, vessel_type, operation_type, computed_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                "#,
            )
            .bind(entry.id)
            .bind(entry.candidate_id)
            .bind(entry.contract_id)
            .bind(entry.batch_id)
            .bind(entry.original_start)
            .bind(entry.original_end)
            .bind(entry.effective_start)
            .bind(entry.effective_end)
            .bind(entry.raw_days)
            .bind(entry.calculated_days)
            .bind(entry.overlap_deducted_days)
            .bind(&entry.rank_code)
            .bind(&entry.vessel_type)
            .bind(&entry.operation_type)
            .bind(entry.computed_at)
            .execute(&mut *tx)
            .await?;
        }

        // Profile row is created here if the candidate has none yet.
        sqlx::query(
            r#"
            INSERT INTO trust_profiles (candidate_id, details)
            VALUES ($1, jsonb_build_object('sea_time', $2::jsonb))
            ON CONFLICT (candidate_id) DO UPDATE
            SET details = trust_profiles.details || jsonb_build_object('sea_time', $2::jsonb),
                updated_at = NOW()
            "#,
        )
        .bind(candidate_id)
        .bind(value)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            "Replaced sea-time ledger for candidate {candidate_id}: {deleted} removed, {} inserted",
            entries.len()
        );
        Ok(())
    }

    async fn save_compliance_pack(
        &self,
        candidate_id: Uuid,
        pack: &CompliancePack,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(pack)?;
        sqlx::query(
            r#"
            INSERT INTO trust_profiles
                (candidate_id, details, compliance_score, compliance_status, compliance_computed_at)
            VALUES ($1, jsonb_build_object('compliance_pack', $2::jsonb), $3, $4, $5)
            ON CONFLICT (candidate_id) DO UPDATE
            SET details = trust_profiles.details || jsonb_build_object('compliance_pack', $2::jsonb),
                compliance_score = EXCLUDED.compliance_score,
                compliance_status = EXCLUDED.compliance_status,
                compliance_computed_at = EXCLUDED.compliance_computed_at,
                updated_at = NOW()
            "#,
        )
        .bind(candidate_id)
        .bind(value)
        .bind(pack.score as i32)
        .bind(pack.status.as_str())
        .bind(pack.computed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AuditSink for PgTrustStore {
    async fn append(&self, event: &TrustEvent) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO trust_events (id, candidate_id, event_type, payload, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.candidate_id)
        .bind(event.event_type.as_str())
        .bind(&event.payload)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
