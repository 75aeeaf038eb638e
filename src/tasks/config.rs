// src/tasks/config.rs
// Configuration for background tasks

use std::time::Duration;

pub struct TaskConfig {
    // Decay processor
    pub decay_enabled: bool,
    pub decay_interval: Duration,

    // Social interaction processor
    pub social_enabled: bool,
    pub social_interval: Duration,

    // Interaction cleanup
    pub cleanup_enabled: bool,
    pub cleanup_interval: Duration,

    // Metrics reporter
    pub metrics_interval: Duration,
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or(default)
}

fn env_secs(key: &str, default: u64) -> Duration {
    Duration::from_secs(
        std::env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse()
            .unwrap_or(default),
    )
}

impl TaskConfig {
    pub fn from_env() -> Self {
        Self {
            // Decay every 4 hours
            decay_enabled: env_flag("TASK_DECAY_ENABLED", true),
            decay_interval: env_secs("TASK_DECAY_INTERVAL", 14400),

            // Social interactions every 2 hours
            social_enabled: env_flag("TASK_SOCIAL_ENABLED", true),
            social_interval: env_secs("TASK_SOCIAL_INTERVAL", 7200),

            // Cleanup once a day
            cleanup_enabled: env_flag("TASK_CLEANUP_ENABLED", true),
            cleanup_interval: env_secs("TASK_CLEANUP_INTERVAL", 86400),

            metrics_interval: env_secs("TASK_METRICS_INTERVAL", 3600),
        }
    }

    /// Get a human-readable summary of the configuration
    pub fn summary(&self) -> String {
        format!(
            "Tasks Config:\n\
            - Decay: {} (every {} hours)\n\
            - Social: {} (every {} hours)\n\
            - Cleanup: {} (every {} hours)",
            if self.decay_enabled { "ON" } else { "OFF" },
            self.decay_interval.as_secs() / 3600,
            if self.social_enabled { "ON" } else { "OFF" },
            self.social_interval.as_secs() / 3600,
            if self.cleanup_enabled { "ON" } else { "OFF" },
            self.cleanup_interval.as_secs() / 3600,
        )
    }
}
