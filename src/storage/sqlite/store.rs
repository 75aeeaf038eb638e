// src/storage/sqlite/store.rs
// Store facade delegating to focused operation modules.

use sqlx::SqlitePool;

use super::companion_ops::CompanionOperations;
use super::event_ops::EventOperations;
use super::settings_ops::SettingsOperations;
use super::social_ops::SocialOperations;

/// The persistence gateway. One pool, one facade; each concern keeps its SQL
/// in its own operations module.
pub struct AyuniStore {
    pub pool: SqlitePool,

    pub companions: CompanionOperations,
    pub events: EventOperations,
    pub social: SocialOperations,
    pub settings: SettingsOperations,
}

impl AyuniStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            companions: CompanionOperations::new(pool.clone()),
            events: EventOperations::new(pool.clone()),
            social: SocialOperations::new(pool.clone()),
            settings: SettingsOperations::new(pool.clone()),
            pool,
        }
    }
}
