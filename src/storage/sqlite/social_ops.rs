// src/storage/sqlite/social_ops.rs
// Contacts and interaction rows for the social batch processor.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AyuniError, Result};
use crate::social::types::{
    dialog_from_json, dialog_to_json, ContactInteraction, DialogTurn, Initiator, SocialContact,
};

#[derive(Debug, sqlx::FromRow)]
struct InteractionRow {
    id: String,
    aei_id: String,
    contact_id: String,
    initiated_by: String,
    dialog_history: String,
    aei_thoughts: Option<String>,
    processed_for_emotions: bool,
    created_at: DateTime<Utc>,
}

impl InteractionRow {
    fn into_interaction(self) -> Result<ContactInteraction> {
        Ok(ContactInteraction {
            initiated_by: Initiator::parse(&self.initiated_by)?,
            dialog_history: dialog_from_json(&self.dialog_history)?,
            id: self.id,
            aei_id: self.aei_id,
            contact_id: self.contact_id,
            aei_thoughts: self.aei_thoughts,
            processed_for_emotions: self.processed_for_emotions,
            created_at: self.created_at,
        })
    }
}

pub struct SocialOperations {
    pool: SqlitePool,
}

impl SocialOperations {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn contact_count(&self, aei_id: &str) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM social_contacts WHERE aei_id = ?")
                .bind(aei_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn insert_contact(&self, aei_id: &str, name: &str, relation: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO social_contacts (id, aei_id, name, relation, active, created_at)
            VALUES (?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(&id)
        .bind(aei_id)
        .bind(name)
        .bind(relation)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn active_contacts(&self, aei_id: &str) -> Result<Vec<SocialContact>> {
        let rows = sqlx::query_as::<_, SocialContact>(
            r#"
            SELECT id, aei_id, name, relation, active
            FROM social_contacts
            WHERE aei_id = ? AND active = 1
            ORDER BY created_at ASC
            "#,
        )
        .bind(aei_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert_interaction(
        &self,
        aei_id: &str,
        contact_id: &str,
        initiated_by: Initiator,
        dialog: &[DialogTurn],
        aei_thoughts: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO contact_interactions
                (id, aei_id, contact_id, initiated_by, dialog_history, aei_thoughts,
                 processed_for_emotions, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(&id)
        .bind(aei_id)
        .bind(contact_id)
        .bind(initiated_by.as_str())
        .bind(dialog_to_json(dialog)?)
        .bind(aei_thoughts)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn get_interaction(&self, interaction_id: &str) -> Result<ContactInteraction> {
        let row = sqlx::query_as::<_, InteractionRow>(
            r#"
            SELECT id, aei_id, contact_id, initiated_by, dialog_history, aei_thoughts,
                   processed_for_emotions, created_at
            FROM contact_interactions
            WHERE id = ?
            "#,
        )
        .bind(interaction_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AyuniError::not_found("interaction", interaction_id))?;

        row.into_interaction()
    }

    pub async fn interactions_for_aei(&self, aei_id: &str) -> Result<Vec<ContactInteraction>> {
        let rows = sqlx::query_as::<_, InteractionRow>(
            r#"
            SELECT id, aei_id, contact_id, initiated_by, dialog_history, aei_thoughts,
                   processed_for_emotions, created_at
            FROM contact_interactions
            WHERE aei_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(aei_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InteractionRow::into_interaction).collect()
    }

    /// The single permitted mutation on an interaction: flag it as folded
    /// into the companion's emotional state.
    pub async fn mark_interaction_processed(&self, interaction_id: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE contact_interactions SET processed_for_emotions = 1 WHERE id = ?")
                .bind(interaction_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AyuniError::not_found("interaction", interaction_id));
        }
        Ok(())
    }

    /// Age-based pruning; returns the exact number of rows removed.
    pub async fn delete_interactions_older_than(&self, retention_days: i64) -> Result<u64> {
        let cutoff = Utc::now() - Duration::days(retention_days.max(1));
        let result = sqlx::query("DELETE FROM contact_interactions WHERE created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn interaction_count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contact_interactions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
