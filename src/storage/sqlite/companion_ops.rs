// src/storage/sqlite/companion_ops.rs
// Users, companions, chat sessions and the emotional state rows they own.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::emotion::EmotionalState;
use crate::error::{AyuniError, Result};

/// Companion profile as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanionRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub persona: String,
    pub relationship_depth: f32,
    pub active: bool,
}

/// One row of the decay batch query: a session joined to its companion's
/// depth and current emotional state.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionDecayRow {
    pub session_id: String,
    pub aei_id: String,
    pub relationship_depth: f32,
    pub last_message_at: DateTime<Utc>,
    pub last_decay_at: Option<DateTime<Utc>>,
    #[sqlx(flatten)]
    pub state: EmotionalState,
}

pub struct CompanionOperations {
    pool: SqlitePool,
}

impl CompanionOperations {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, user_name: &str, email: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO users (id, user_name, email, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(user_name)
            .bind(email)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn create_aei(
        &self,
        user_id: &str,
        name: &str,
        persona: &str,
        relationship_depth: f32,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO aeis (id, user_id, name, persona, relationship_depth, active, created_at)
            VALUES (?, ?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(name)
        .bind(persona)
        .bind(relationship_depth.clamp(0.0, 1.0))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn get_aei(&self, aei_id: &str) -> Result<CompanionRecord> {
        sqlx::query_as::<_, CompanionRecord>(
            "SELECT id, user_id, name, persona, relationship_depth, active FROM aeis WHERE id = ?",
        )
        .bind(aei_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AyuniError::not_found("aei", aei_id))
    }

    pub async fn active_aeis(&self) -> Result<Vec<CompanionRecord>> {
        let rows = sqlx::query_as::<_, CompanionRecord>(
            r#"
            SELECT id, user_id, name, persona, relationship_depth, active
            FROM aeis
            WHERE active = 1
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a session and its default emotional state in one transaction.
    pub async fn create_session(
        &self,
        aei_id: &str,
        last_message_at: DateTime<Utc>,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO chat_sessions (id, aei_id, last_message_at, last_decay_at, created_at)
            VALUES (?, ?, ?, NULL, ?)
            "#,
        )
        .bind(&id)
        .bind(aei_id)
        .bind(last_message_at)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let state = EmotionalState::default();
        sqlx::query(
            r#"
            INSERT INTO emotional_states
                (session_id, loneliness, sadness, boredom, fear_of_abandonment,
                 joy, love, trust, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(state.loneliness)
        .bind(state.sadness)
        .bind(state.boredom)
        .bind(state.fear_of_abandonment)
        .bind(state.joy)
        .bind(state.love)
        .bind(state.trust)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    /// All sessions of active companions, joined to depth and current state.
    /// The decay batch walks this result set.
    pub async fn sessions_for_decay(&self) -> Result<Vec<SessionDecayRow>> {
        let rows = sqlx::query_as::<_, SessionDecayRow>(
            r#"
            SELECT
                s.id AS session_id,
                s.aei_id,
                a.relationship_depth,
                s.last_message_at,
                s.last_decay_at,
                e.loneliness, e.sadness, e.boredom, e.fear_of_abandonment,
                e.joy, e.love, e.trust
            FROM chat_sessions s
            JOIN aeis a ON a.id = s.aei_id
            JOIN emotional_states e ON e.session_id = s.id
            WHERE a.active = 1
            ORDER BY s.last_message_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn load_emotional_state(&self, session_id: &str) -> Result<EmotionalState> {
        sqlx::query_as::<_, EmotionalState>(
            r#"
            SELECT loneliness, sadness, boredom, fear_of_abandonment, joy, love, trust
            FROM emotional_states
            WHERE session_id = ?
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?
        .map(EmotionalState::clamped)
        .ok_or_else(|| AyuniError::not_found("emotional state", session_id))
    }

    /// Plain state write, used by chat-message processing. Does not touch
    /// the decay marker.
    pub async fn save_emotional_state(
        &self,
        session_id: &str,
        state: &EmotionalState,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let state = state.clamped();
        sqlx::query(
            r#"
            UPDATE emotional_states
            SET loneliness = ?, sadness = ?, boredom = ?, fear_of_abandonment = ?,
                joy = ?, love = ?, trust = ?, updated_at = ?
            WHERE session_id = ?
            "#,
        )
        .bind(state.loneliness)
        .bind(state.sadness)
        .bind(state.boredom)
        .bind(state.fear_of_abandonment)
        .bind(state.joy)
        .bind(state.love)
        .bind(state.trust)
        .bind(now)
        .bind(session_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Persist a new emotional state and stamp the decay marker.
    pub async fn save_decayed_state(
        &self,
        session_id: &str,
        state: &EmotionalState,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let state = state.clamped();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE emotional_states
            SET loneliness = ?, sadness = ?, boredom = ?, fear_of_abandonment = ?,
                joy = ?, love = ?, trust = ?, updated_at = ?
            WHERE session_id = ?
            "#,
        )
        .bind(state.loneliness)
        .bind(state.sadness)
        .bind(state.boredom)
        .bind(state.fear_of_abandonment)
        .bind(state.joy)
        .bind(state.love)
        .bind(state.trust)
        .bind(now)
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE chat_sessions SET last_decay_at = ? WHERE id = ?")
            .bind(now)
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn touch_last_message(
        &self,
        session_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("UPDATE chat_sessions SET last_message_at = ? WHERE id = ?")
            .bind(at)
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
