// src/decay/processor.rs
// Walks every active session, applies the decay policy, persists changed
// states and appends decay events. One pass per trigger (admin action, CLI
// one-shot, or background interval).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::emotion::{compute_decay, DecayPolicyConfig};
use crate::error::Result;
use crate::notify::ProactiveNotifier;
use crate::scheduler::{JobScheduler, JobType, RunReport};
use crate::storage::sqlite::companion_ops::SessionDecayRow;
use crate::storage::sqlite::event_ops::{AffectedAei, DailyDecayStats};
use crate::storage::AyuniStore;

/// Typed outcome of one batch pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DecayRunSummary {
    /// Sessions examined (eligible or not).
    pub processed: u64,
    /// Sessions that recorded a decay event.
    pub decayed: u64,
    /// Proactive message triggers fired.
    pub triggered: u64,
    /// Per-row persistence failures (logged, not fatal).
    pub failed: u64,
    /// True when another run held the job lock and nothing was done.
    pub already_running: bool,
}

pub struct DecayProcessor {
    store: Arc<AyuniStore>,
    scheduler: Arc<JobScheduler>,
    notifier: Arc<dyn ProactiveNotifier>,
    policy: DecayPolicyConfig,
}

impl DecayProcessor {
    pub fn new(
        store: Arc<AyuniStore>,
        scheduler: Arc<JobScheduler>,
        notifier: Arc<dyn ProactiveNotifier>,
        policy: DecayPolicyConfig,
    ) -> Self {
        Self {
            store,
            scheduler,
            notifier,
            policy,
        }
    }

    /// One decay pass over all eligible sessions.
    ///
    /// The initial batch query aborts the whole call on persistence failure;
    /// after that, sessions are independent and per-row failures are counted
    /// and skipped. The job lock makes overlapping passes mutually exclusive.
    pub async fn process_all_eligible_sessions(&self) -> Result<DecayRunSummary> {
        if !self.scheduler.try_acquire(JobType::EmotionalDecay).await? {
            return Ok(DecayRunSummary {
                already_running: true,
                ..Default::default()
            });
        }

        let started = std::time::Instant::now();
        let result = self.run_pass().await;
        if let Err(e) = self.scheduler.release(JobType::EmotionalDecay).await {
            warn!("Failed to release decay job lock: {e}");
        }

        let summary = result?;
        let report = RunReport {
            timestamp: Utc::now(),
            processed_aeis: summary.decayed,
            cleaned_interactions: 0,
            execution_time: started.elapsed().as_secs_f64(),
        };
        if let Err(e) = self.scheduler.record_run(JobType::EmotionalDecay, &report).await {
            warn!("Failed to record decay run report: {e}");
        }

        info!(
            "Decay pass complete: {} examined, {} decayed, {} triggered, {} failed",
            summary.processed, summary.decayed, summary.triggered, summary.failed
        );
        Ok(summary)
    }

    async fn run_pass(&self) -> Result<DecayRunSummary> {
        let rows = self.store.companions.sessions_for_decay().await?;
        let now = Utc::now();
        let mut summary = DecayRunSummary::default();

        for row in rows {
            summary.processed += 1;
            match self.process_session(&row, now).await {
                Ok(SessionOutcome::Decayed { triggered }) => {
                    summary.decayed += 1;
                    if triggered {
                        summary.triggered += 1;
                    }
                }
                Ok(SessionOutcome::Unchanged) => {}
                Err(e) => {
                    summary.failed += 1;
                    error!("Decay failed for session {}: {e}", row.session_id);
                }
            }
        }

        Ok(summary)
    }

    async fn process_session(
        &self,
        row: &SessionDecayRow,
        now: DateTime<Utc>,
    ) -> Result<SessionOutcome> {
        let hours_inactive = hours_between(row.last_message_at, now);
        if hours_inactive < self.policy.min_inactive_hours {
            return Ok(SessionOutcome::Unchanged);
        }

        // Decay accrues only since the later of last message / last applied
        // decay, which makes an immediate re-run a no-op.
        let baseline = row.last_decay_at.map_or(row.last_message_at, |decayed_at| {
            decayed_at.max(row.last_message_at)
        });
        let accrual_hours = hours_between(baseline, now);

        let outcome = compute_decay(
            &row.state,
            accrual_hours,
            row.relationship_depth,
            &self.policy,
        );
        if outcome.changed_fields == 0 {
            return Ok(SessionOutcome::Unchanged);
        }

        self.store
            .companions
            .save_decayed_state(&row.session_id, &outcome.state, now)
            .await?;
        self.store
            .events
            .insert_decay_event(&row.session_id, hours_inactive, outcome.changed_fields, now)
            .await?;

        // Trigger evaluation uses total inactivity, not the accrual window,
        // so the 48-hour clause sees the full silence.
        let triggered = crate::emotion::proactive_trigger(&outcome.state, hours_inactive);
        if triggered {
            // Fire-and-forget: a notifier failure never fails the row.
            if let Err(e) = self
                .notifier
                .notify_proactive_message(&row.session_id, &row.aei_id, &outcome.state, hours_inactive)
                .await
            {
                warn!("Proactive notification failed for {}: {e:#}", row.session_id);
            }
        }

        info!(
            "Session {} decayed after {:.1}h inactive ({} fields changed)",
            row.session_id, hours_inactive, outcome.changed_fields
        );
        Ok(SessionOutcome::Decayed { triggered })
    }

    // ── Reporting ──

    pub async fn decay_statistics(&self, window_days: i64) -> Result<Vec<DailyDecayStats>> {
        self.store.events.decay_statistics(window_days).await
    }

    pub async fn most_affected_aeis(&self, limit: i64) -> Result<Vec<AffectedAei>> {
        self.store.events.most_affected_aeis(limit).await
    }
}

enum SessionOutcome {
    Decayed { triggered: bool },
    Unchanged,
}

fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds().max(0) as f64 / 3600.0
}
