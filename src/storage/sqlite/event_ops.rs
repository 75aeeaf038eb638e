// src/storage/sqlite/event_ops.rs
// Append-only decay event log and the aggregates the admin pages read.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::Result;

/// Per-day aggregate over the decay event log.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyDecayStats {
    pub day: String,
    pub events: i64,
    pub avg_hours_inactive: f64,
    pub avg_changed_fields: f64,
}

/// Ranking row for the companions hit hardest by decay.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AffectedAei {
    pub companion_name: String,
    pub user_name: String,
    pub decay_event_count: i64,
    pub max_hours_inactive: f64,
    pub avg_emotional_changes: f64,
}

pub struct EventOperations {
    pool: SqlitePool,
}

impl EventOperations {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_decay_event(
        &self,
        session_id: &str,
        hours_inactive: f64,
        changed_fields: u32,
        at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO decay_events (session_id, hours_inactive, changed_fields, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(session_id)
        .bind(hours_inactive)
        .bind(changed_fields as i64)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn count_events(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM decay_events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Per-day aggregates over the last `window_days` days.
    pub async fn decay_statistics(&self, window_days: i64) -> Result<Vec<DailyDecayStats>> {
        let since = Utc::now() - Duration::days(window_days.max(1));
        let rows = sqlx::query_as::<_, DailyDecayStats>(
            r#"
            SELECT
                date(created_at) AS day,
                COUNT(*) AS events,
                AVG(hours_inactive) AS avg_hours_inactive,
                AVG(changed_fields) AS avg_changed_fields
            FROM decay_events
            WHERE created_at >= ?
            GROUP BY date(created_at)
            ORDER BY day DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Companions ranked by decay event count over the last 30 days.
    pub async fn most_affected_aeis(&self, limit: i64) -> Result<Vec<AffectedAei>> {
        let since = Utc::now() - Duration::days(30);
        let rows = sqlx::query_as::<_, AffectedAei>(
            r#"
            SELECT
                a.name AS companion_name,
                u.user_name AS user_name,
                COUNT(d.id) AS decay_event_count,
                MAX(d.hours_inactive) AS max_hours_inactive,
                AVG(d.changed_fields) AS avg_emotional_changes
            FROM decay_events d
            JOIN chat_sessions s ON s.id = d.session_id
            JOIN aeis a ON a.id = s.aei_id
            JOIN users u ON u.id = a.user_id
            WHERE d.created_at >= ?
            GROUP BY a.id
            ORDER BY decay_event_count DESC
            LIMIT ?
            "#,
        )
        .bind(since)
        .bind(limit.max(1))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
