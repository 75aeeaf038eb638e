// src/storage/sqlite/settings_ops.rs
// Job-run bookkeeping: debounce timestamps, the single-flight lock, and the
// JSON report of the last completed run.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::Result;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobRunRecord {
    pub job_type: String,
    pub last_run_at: Option<DateTime<Utc>>,
    pub locked_at: Option<DateTime<Utc>>,
    pub last_report: Option<String>,
}

pub struct SettingsOperations {
    pool: SqlitePool,
}

impl SettingsOperations {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn ensure_row(&self, job_type: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO job_runs (job_type) VALUES (?)")
            .bind(job_type)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_job_run(&self, job_type: &str) -> Result<Option<JobRunRecord>> {
        let row = sqlx::query_as::<_, JobRunRecord>(
            "SELECT job_type, last_run_at, locked_at, last_report FROM job_runs WHERE job_type = ?",
        )
        .bind(job_type)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn record_last_run(&self, job_type: &str, at: DateTime<Utc>) -> Result<()> {
        self.ensure_row(job_type).await?;
        sqlx::query("UPDATE job_runs SET last_run_at = ? WHERE job_type = ?")
            .bind(at)
            .bind(job_type)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Claim the job lock with a conditional update. The write succeeds for
    /// exactly one caller; everyone else sees zero affected rows. A lock
    /// older than `stale_before` counts as abandoned and is reclaimable.
    pub async fn try_lock_job(
        &self,
        job_type: &str,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool> {
        self.ensure_row(job_type).await?;
        let result = sqlx::query(
            r#"
            UPDATE job_runs
            SET locked_at = ?
            WHERE job_type = ? AND (locked_at IS NULL OR locked_at < ?)
            "#,
        )
        .bind(now)
        .bind(job_type)
        .bind(stale_before)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn unlock_job(&self, job_type: &str) -> Result<()> {
        sqlx::query("UPDATE job_runs SET locked_at = NULL WHERE job_type = ?")
            .bind(job_type)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn store_job_report(&self, job_type: &str, report_json: &str) -> Result<()> {
        self.ensure_row(job_type).await?;
        sqlx::query("UPDATE job_runs SET last_report = ? WHERE job_type = ?")
            .bind(report_json)
            .bind(job_type)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
