// src/scheduler/mod.rs
// Job bookkeeping: the coarse one-hour debounce the admin page uses, plus a
// single-flight guard so overlapping triggers cannot double-apply a batch.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::AyuniStore;

/// Job identities for the bookkeeping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    EmotionalDecay,
    SocialInteraction,
    InteractionCleanup,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmotionalDecay => "emotional_decay",
            Self::SocialInteraction => "social_interaction",
            Self::InteractionCleanup => "interaction_cleanup",
        }
    }
}

/// JSON report persisted after a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,
    pub processed_aeis: u64,
    pub cleaned_interactions: u64,
    pub execution_time: f64,
}

/// RAII-less guard handle; call `release` when the batch finishes. The lock
/// is reclaimable after the stale window, so a crashed holder cannot wedge
/// the job forever.
pub struct JobScheduler {
    store: Arc<AyuniStore>,
    debounce: Duration,
    lock_stale: Duration,
}

impl JobScheduler {
    pub fn new(store: Arc<AyuniStore>, debounce_minutes: i64, lock_stale_minutes: i64) -> Self {
        Self {
            store,
            debounce: Duration::minutes(debounce_minutes),
            lock_stale: Duration::minutes(lock_stale_minutes),
        }
    }

    /// Debounced scheduling: returns false (no-op) when a decay job already
    /// ran inside the debounce window, true after recording a fresh stamp.
    pub async fn schedule_decay_processing(&self) -> Result<bool> {
        let job = JobType::EmotionalDecay;
        let now = Utc::now();

        if let Some(record) = self.store.settings.get_job_run(job.as_str()).await? {
            if let Some(last_run) = record.last_run_at {
                if now - last_run < self.debounce {
                    debug!(
                        "Decay job already scheduled {}m ago, skipping",
                        (now - last_run).num_minutes()
                    );
                    return Ok(false);
                }
            }
        }

        self.store.settings.record_last_run(job.as_str(), now).await?;
        Ok(true)
    }

    /// Claim the single-flight lock for `job`. Exactly one concurrent caller
    /// wins; the conditional update is the atomic compare-and-swap.
    pub async fn try_acquire(&self, job: JobType) -> Result<bool> {
        let now = Utc::now();
        let stale_before = now - self.lock_stale;
        let acquired = self
            .store
            .settings
            .try_lock_job(job.as_str(), now, stale_before)
            .await?;

        if !acquired {
            warn!("Job '{}' is already running, refusing overlap", job.as_str());
        }
        Ok(acquired)
    }

    pub async fn release(&self, job: JobType) -> Result<()> {
        self.store.settings.unlock_job(job.as_str()).await
    }

    /// Persist the run report JSON and stamp the run time.
    pub async fn record_run(&self, job: JobType, report: &RunReport) -> Result<()> {
        let json = serde_json::to_string(report)
            .map_err(|e| crate::error::AyuniError::InvalidData(e.to_string()))?;
        self.store.settings.store_job_report(job.as_str(), &json).await?;
        self.store
            .settings
            .record_last_run(job.as_str(), report.timestamp)
            .await
    }

    pub async fn last_report(&self, job: JobType) -> Result<Option<RunReport>> {
        let record = self.store.settings.get_job_run(job.as_str()).await?;
        let Some(raw) = record.and_then(|r| r.last_report) else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| crate::error::AyuniError::InvalidData(format!("corrupt run report: {e}")))
    }
}
