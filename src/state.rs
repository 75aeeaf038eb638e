// src/state.rs

use std::sync::Arc;

use crate::config::CONFIG;
use crate::decay::DecayProcessor;
use crate::emotion::DecayPolicyConfig;
use crate::llm::DialogGenerator;
use crate::notify::ProactiveNotifier;
use crate::scheduler::JobScheduler;
use crate::social::{SocialConfig, SocialProcessor};
use crate::storage::AyuniStore;

/// Shared application state: the store plus the assembled processors.
pub struct AppState {
    pub store: Arc<AyuniStore>,
    pub scheduler: Arc<JobScheduler>,
    pub decay: Arc<DecayProcessor>,
    pub social: Arc<SocialProcessor>,
}

impl AppState {
    /// Wire the processors around a store with explicit collaborators.
    /// Tests pass scripted generators/notifiers and their own configs here.
    pub fn assemble(
        store: Arc<AyuniStore>,
        generator: Arc<dyn DialogGenerator>,
        notifier: Arc<dyn ProactiveNotifier>,
        policy: DecayPolicyConfig,
        social_config: SocialConfig,
        debounce_minutes: i64,
        lock_stale_minutes: i64,
    ) -> Self {
        let scheduler = Arc::new(JobScheduler::new(
            store.clone(),
            debounce_minutes,
            lock_stale_minutes,
        ));

        let decay = Arc::new(DecayProcessor::new(
            store.clone(),
            scheduler.clone(),
            notifier,
            policy,
        ));

        let social = Arc::new(SocialProcessor::new(
            store.clone(),
            scheduler.clone(),
            generator,
            social_config,
        ));

        Self {
            store,
            scheduler,
            decay,
            social,
        }
    }

    /// Production wiring from the global config.
    pub fn from_config(
        store: Arc<AyuniStore>,
        generator: Arc<dyn DialogGenerator>,
        notifier: Arc<dyn ProactiveNotifier>,
    ) -> Self {
        let policy = DecayPolicyConfig {
            min_inactive_hours: CONFIG.decay_min_inactive_hours,
            epsilon: CONFIG.decay_epsilon,
            ..Default::default()
        };

        Self::assemble(
            store,
            generator,
            notifier,
            policy,
            SocialConfig::from_env(),
            CONFIG.schedule_debounce_minutes,
            CONFIG.job_lock_stale_minutes,
        )
    }
}
