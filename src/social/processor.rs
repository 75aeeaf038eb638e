// src/social/processor.rs
// Gives each companion a simulated social life: seeds starter contacts and
// periodically generates contact interactions through the dialog provider.

use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{AyuniError, Result};
use crate::llm::{DialogGenerator, InteractionRequest};
use crate::scheduler::{JobScheduler, JobType, RunReport};
use crate::social::types::Initiator;
use crate::storage::AyuniStore;

/// Starter acquaintances seeded into a fresh social environment.
const STARTER_POOL: &[(&str, &str)] = &[
    ("Noa", "old friend"),
    ("Milan", "neighbor"),
    ("Priya", "coworker"),
    ("Jesse", "gym buddy"),
    ("Sam", "cousin"),
    ("Lena", "book club friend"),
    ("Tariq", "childhood friend"),
    ("Yuki", "pen pal"),
];

#[derive(Debug, Clone)]
pub struct SocialConfig {
    /// Chance per pass that a companion has an interaction at all.
    pub interaction_chance: f64,
    /// Chance that the contact (rather than the companion) opens.
    pub contact_initiated_bias: f64,
    /// Contacts created by environment initialization.
    pub starter_contacts: usize,
    /// Interactions older than this are removed by cleanup.
    pub retention_days: i64,
}

impl SocialConfig {
    pub fn from_env() -> Self {
        let config = &crate::config::CONFIG;
        Self {
            interaction_chance: config.social_interaction_chance,
            contact_initiated_bias: config.social_contact_initiated_bias,
            starter_contacts: config.social_starter_contacts,
            retention_days: config.interaction_retention_days,
        }
    }
}

/// Outcome for one companion in a social pass.
#[derive(Debug, Clone, Serialize)]
pub struct AeiSocialOutcome {
    pub aei_id: String,
    pub interactions_generated: u32,
    /// Set when the pass did nothing for a benign reason.
    pub skipped_reason: Option<&'static str>,
}

/// Typed aggregate of one full social pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SocialRunSummary {
    pub processed: u64,
    pub interactions: u64,
    pub failures: u64,
    pub already_running: bool,
}

pub struct SocialProcessor {
    store: Arc<AyuniStore>,
    scheduler: Arc<JobScheduler>,
    generator: Arc<dyn DialogGenerator>,
    config: SocialConfig,
}

impl SocialProcessor {
    pub fn new(
        store: Arc<AyuniStore>,
        scheduler: Arc<JobScheduler>,
        generator: Arc<dyn DialogGenerator>,
        config: SocialConfig,
    ) -> Self {
        Self {
            store,
            scheduler,
            generator,
            config,
        }
    }

    /// Seed a starter set of contacts for a companion that has none.
    /// Idempotent: a companion with contacts gets `Ok(false)`, not an error.
    pub async fn initialize_social_environment(&self, aei_id: &str) -> Result<bool> {
        let aei = self.store.companions.get_aei(aei_id).await?;

        if self.store.social.contact_count(&aei.id).await? > 0 {
            info!("Social environment for {} already initialized", aei.id);
            return Ok(false);
        }

        let count = self.config.starter_contacts.clamp(1, STARTER_POOL.len());
        let picks: Vec<_> = {
            let mut rng = rand::rng();
            STARTER_POOL
                .choose_multiple(&mut rng, count)
                .copied()
                .collect()
        };
        for (name, relation) in picks {
            self.store.social.insert_contact(&aei.id, name, relation).await?;
        }

        info!("Seeded {} contacts for companion {}", count, aei.id);
        Ok(true)
    }

    /// One social pass for a single companion. Generates at most one
    /// interaction, gated by the cadence probability.
    pub async fn process_single_aei(&self, aei_id: &str) -> Result<AeiSocialOutcome> {
        let aei = self.store.companions.get_aei(aei_id).await?;

        let contacts = self.store.social.active_contacts(&aei.id).await?;
        if contacts.is_empty() {
            return Ok(AeiSocialOutcome {
                aei_id: aei.id,
                interactions_generated: 0,
                skipped_reason: Some("no active contacts"),
            });
        }

        let (fired, contact_index, contact_opens) = {
            let mut rng = rand::rng();
            (
                rng.random_bool(self.config.interaction_chance.clamp(0.0, 1.0)),
                rng.random_range(0..contacts.len()),
                rng.random_bool(self.config.contact_initiated_bias.clamp(0.0, 1.0)),
            )
        };
        if !fired {
            return Ok(AeiSocialOutcome {
                aei_id: aei.id,
                interactions_generated: 0,
                skipped_reason: Some("cadence roll"),
            });
        }

        let contact = &contacts[contact_index];
        let initiated_by = if contact_opens {
            Initiator::Contact
        } else {
            Initiator::Companion
        };

        let request = InteractionRequest {
            companion_name: aei.name.clone(),
            companion_persona: aei.persona.clone(),
            contact_name: contact.name.clone(),
            contact_relation: contact.relation.clone(),
            initiated_by,
        };
        let generated = self.generator.generate_interaction(&request).await?;

        self.store
            .social
            .insert_interaction(
                &aei.id,
                &contact.id,
                initiated_by,
                &generated.turns,
                generated.thoughts.as_deref(),
                Utc::now(),
            )
            .await?;

        info!(
            "Generated {}-turn interaction for {} with {}",
            generated.turns.len(),
            aei.name,
            contact.name
        );
        Ok(AeiSocialOutcome {
            aei_id: aei.id,
            interactions_generated: 1,
            skipped_reason: None,
        })
    }

    /// Social pass over all active companions. Per-companion failures are
    /// logged and counted; the pass always runs to the end.
    pub async fn process_all_aei_social(&self) -> Result<SocialRunSummary> {
        if !self.scheduler.try_acquire(JobType::SocialInteraction).await? {
            return Ok(SocialRunSummary {
                already_running: true,
                ..Default::default()
            });
        }

        let started = std::time::Instant::now();
        let result = self.run_pass().await;
        if let Err(e) = self.scheduler.release(JobType::SocialInteraction).await {
            warn!("Failed to release social job lock: {e}");
        }

        let summary = result?;
        let report = RunReport {
            timestamp: Utc::now(),
            processed_aeis: summary.processed,
            cleaned_interactions: 0,
            execution_time: started.elapsed().as_secs_f64(),
        };
        if let Err(e) = self.scheduler.record_run(JobType::SocialInteraction, &report).await {
            warn!("Failed to record social run report: {e}");
        }

        info!(
            "Social pass complete: {} companions, {} interactions, {} failures",
            summary.processed, summary.interactions, summary.failures
        );
        Ok(summary)
    }

    async fn run_pass(&self) -> Result<SocialRunSummary> {
        let aeis = self.store.companions.active_aeis().await?;
        let mut summary = SocialRunSummary::default();

        for aei in aeis {
            summary.processed += 1;
            match self.process_single_aei(&aei.id).await {
                Ok(outcome) => summary.interactions += u64::from(outcome.interactions_generated),
                Err(AyuniError::Persistence(e)) => {
                    // Storage going away mid-pass is not a per-companion skip
                    return Err(AyuniError::Persistence(e));
                }
                Err(e) => {
                    summary.failures += 1;
                    error!("Social processing failed for {}: {e}", aei.id);
                }
            }
        }

        Ok(summary)
    }

    /// Prune interactions older than the retention window.
    pub async fn cleanup_old_interactions(&self) -> Result<u64> {
        let started = std::time::Instant::now();
        let deleted = self
            .store
            .social
            .delete_interactions_older_than(self.config.retention_days)
            .await?;

        let report = RunReport {
            timestamp: Utc::now(),
            processed_aeis: 0,
            cleaned_interactions: deleted,
            execution_time: started.elapsed().as_secs_f64(),
        };
        if let Err(e) = self.scheduler.record_run(JobType::InteractionCleanup, &report).await {
            warn!("Failed to record cleanup report: {e}");
        }

        info!("Cleanup removed {} interactions", deleted);
        Ok(deleted)
    }

    /// Flip the downstream-integration flag on one interaction.
    pub async fn mark_interaction_processed(&self, interaction_id: &str) -> Result<()> {
        self.store.social.mark_interaction_processed(interaction_id).await
    }
}
