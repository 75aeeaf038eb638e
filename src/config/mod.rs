// src/config/mod.rs
// All values load from .env / environment with per-key defaults.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct AyuniConfig {
    // ── Database Configuration
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Server Configuration
    pub host: String,
    pub port: u16,

    // ── Text Generation Collaborator
    pub textgen_base_url: String,
    pub textgen_api_key: String,
    pub textgen_model: String,
    pub textgen_timeout: u64,

    // ── Decay Processing
    pub decay_min_inactive_hours: f64,
    pub decay_epsilon: f32,

    // ── Social Interaction Processing
    pub social_interaction_chance: f64,
    pub social_contact_initiated_bias: f64,
    pub social_starter_contacts: usize,
    pub interaction_retention_days: i64,

    // ── Scheduler
    pub schedule_debounce_minutes: i64,
    pub job_lock_stale_minutes: i64,

    // ── Logging Configuration
    pub log_level: String,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            // Tolerate trailing comments and whitespace in .env values
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl AyuniConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            database_url: env_var_or("DATABASE_URL", "sqlite:./ayuni.db".to_string()),
            sqlite_max_connections: env_var_or("SQLITE_MAX_CONNECTIONS", 10),
            host: env_var_or("AYUNI_HOST", "0.0.0.0".to_string()),
            port: env_var_or("AYUNI_PORT", 3010),
            textgen_base_url: env_var_or(
                "TEXTGEN_BASE_URL",
                "https://api.openai.com/v1".to_string(),
            ),
            textgen_api_key: env_var_or("TEXTGEN_API_KEY", String::new()),
            textgen_model: env_var_or("TEXTGEN_MODEL", "gpt-4.1-mini".to_string()),
            textgen_timeout: env_var_or("TEXTGEN_TIMEOUT", 30),
            decay_min_inactive_hours: env_var_or("AYUNI_DECAY_MIN_INACTIVE_HOURS", 2.0),
            decay_epsilon: env_var_or("AYUNI_DECAY_EPSILON", 1e-4),
            social_interaction_chance: env_var_or("AYUNI_SOCIAL_INTERACTION_CHANCE", 0.25),
            social_contact_initiated_bias: env_var_or("AYUNI_SOCIAL_CONTACT_BIAS", 0.6),
            social_starter_contacts: env_var_or("AYUNI_SOCIAL_STARTER_CONTACTS", 4),
            interaction_retention_days: env_var_or("AYUNI_INTERACTION_RETENTION_DAYS", 30),
            schedule_debounce_minutes: env_var_or("AYUNI_SCHEDULE_DEBOUNCE_MINUTES", 60),
            job_lock_stale_minutes: env_var_or("AYUNI_JOB_LOCK_STALE_MINUTES", 10),
            log_level: env_var_or("AYUNI_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout for text-generation requests in milliseconds
    pub fn textgen_timeout_ms(&self) -> u64 {
        self.textgen_timeout * 1000
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<AyuniConfig> = Lazy::new(AyuniConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AyuniConfig::from_env();

        assert_eq!(config.decay_min_inactive_hours, 2.0);
        assert_eq!(config.interaction_retention_days, 30);
        assert!(config.social_interaction_chance > 0.0);
    }

    #[test]
    fn test_bind_address() {
        let config = AyuniConfig::from_env();
        assert!(config.bind_address().contains(':'));
    }

    #[test]
    fn test_timeout_conversion() {
        let config = AyuniConfig::from_env();
        assert_eq!(config.textgen_timeout_ms(), config.textgen_timeout * 1000);
    }
}
