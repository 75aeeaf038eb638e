// tests/test_helpers.rs
// Shared fixtures: in-memory database with the real migrations, scripted
// collaborators, and an assembled AppState.

#![allow(dead_code)] // each test binary uses a subset of these fixtures

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use sqlx::sqlite::SqlitePoolOptions;

use ayuni::emotion::{DecayPolicyConfig, EmotionalState};
use ayuni::error::{AyuniError, Result};
use ayuni::llm::{DialogGenerator, GeneratedInteraction, InteractionRequest};
use ayuni::notify::ProactiveNotifier;
use ayuni::social::types::{DialogTurn, Speaker};
use ayuni::social::SocialConfig;
use ayuni::state::AppState;
use ayuni::storage::AyuniStore;

/// In-memory SQLite with the real migrations applied. A single connection
/// keeps every handle on the same database.
pub async fn setup_store() -> Arc<AyuniStore> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("create in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    Arc::new(AyuniStore::new(pool))
}

/// Deterministic generator: always returns the same two-turn exchange.
pub struct ScriptedDialogGenerator;

#[async_trait]
impl DialogGenerator for ScriptedDialogGenerator {
    async fn generate_interaction(
        &self,
        request: &InteractionRequest,
    ) -> Result<GeneratedInteraction> {
        Ok(GeneratedInteraction {
            turns: vec![
                DialogTurn {
                    speaker: Speaker::Contact,
                    text: format!("Hey {}, got a minute?", request.companion_name),
                },
                DialogTurn {
                    speaker: Speaker::Companion,
                    text: "Always for you!".to_string(),
                },
            ],
            thoughts: Some("That was a nice chat.".to_string()),
        })
    }
}

/// Generator that always fails like a timed-out collaborator.
pub struct FailingDialogGenerator;

#[async_trait]
impl DialogGenerator for FailingDialogGenerator {
    async fn generate_interaction(
        &self,
        _request: &InteractionRequest,
    ) -> Result<GeneratedInteraction> {
        Err(AyuniError::external("simulated provider timeout"))
    }
}

/// Notifier that records every trigger for assertions.
#[derive(Default)]
pub struct CollectingNotifier {
    pub notified_sessions: Mutex<Vec<String>>,
}

#[async_trait]
impl ProactiveNotifier for CollectingNotifier {
    async fn notify_proactive_message(
        &self,
        session_id: &str,
        _aei_id: &str,
        _state: &EmotionalState,
        _hours_inactive: f64,
    ) -> anyhow::Result<()> {
        self.notified_sessions.lock().push(session_id.to_string());
        Ok(())
    }
}

/// Social config with the cadence pinned so single-pass tests are
/// deterministic.
pub fn deterministic_social_config() -> SocialConfig {
    SocialConfig {
        interaction_chance: 1.0,
        contact_initiated_bias: 0.5,
        starter_contacts: 3,
        retention_days: 30,
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub store: Arc<AyuniStore>,
    pub notifier: Arc<CollectingNotifier>,
}

pub async fn setup_app_with(generator: Arc<dyn DialogGenerator>) -> TestApp {
    let store = setup_store().await;
    let notifier = Arc::new(CollectingNotifier::default());

    let state = Arc::new(AppState::assemble(
        store.clone(),
        generator,
        notifier.clone(),
        DecayPolicyConfig::default(),
        deterministic_social_config(),
        60,
        10,
    ));

    TestApp {
        state,
        store,
        notifier,
    }
}

pub async fn setup_app() -> TestApp {
    setup_app_with(Arc::new(ScriptedDialogGenerator)).await
}

/// A user, companion, and session whose last message was `inactive_hours`
/// ago. Returns (aei_id, session_id).
pub async fn seed_companion_session(
    store: &AyuniStore,
    name: &str,
    relationship_depth: f32,
    inactive_hours: i64,
) -> (String, String) {
    let user_id = store
        .companions
        .create_user(&format!("user-of-{name}"), "user@example.com")
        .await
        .expect("create user");
    let aei_id = store
        .companions
        .create_aei(&user_id, name, "warm and curious", relationship_depth)
        .await
        .expect("create aei");
    let session_id = store
        .companions
        .create_session(&aei_id, Utc::now() - Duration::hours(inactive_hours))
        .await
        .expect("create session");

    (aei_id, session_id)
}
