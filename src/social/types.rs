// src/social/types.rs
// Tagged structures for the simulated social environment. Dialog history
// crosses the persistence boundary as JSON but is always validated into
// these types on load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AyuniError, Result};

/// Who spoke a dialog turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Companion,
    Contact,
}

/// One turn of a simulated conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Which side opened the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initiator {
    Companion,
    Contact,
}

impl Initiator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Companion => "companion",
            Self::Contact => "contact",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "companion" => Ok(Self::Companion),
            "contact" => Ok(Self::Contact),
            other => Err(AyuniError::InvalidData(format!(
                "unknown initiator '{other}'"
            ))),
        }
    }
}

/// A companion's simulated acquaintance.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SocialContact {
    pub id: String,
    pub aei_id: String,
    pub name: String,
    pub relation: String,
    pub active: bool,
}

/// A simulated event between a companion and one of its contacts.
#[derive(Debug, Clone)]
pub struct ContactInteraction {
    pub id: String,
    pub aei_id: String,
    pub contact_id: String,
    pub initiated_by: Initiator,
    pub dialog_history: Vec<DialogTurn>,
    pub aei_thoughts: Option<String>,
    pub processed_for_emotions: bool,
    pub created_at: DateTime<Utc>,
}

/// Serialize dialog turns for storage.
pub fn dialog_to_json(turns: &[DialogTurn]) -> Result<String> {
    serde_json::to_string(turns)
        .map_err(|e| AyuniError::InvalidData(format!("dialog serialization failed: {e}")))
}

/// Validate stored dialog JSON back into turns, preserving order.
pub fn dialog_from_json(raw: &str) -> Result<Vec<DialogTurn>> {
    serde_json::from_str(raw)
        .map_err(|e| AyuniError::InvalidData(format!("dialog history corrupt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_round_trip_preserves_order() {
        let turns = vec![
            DialogTurn {
                speaker: Speaker::Contact,
                text: "Hey, long time!".into(),
            },
            DialogTurn {
                speaker: Speaker::Companion,
                text: "I know - how have you been?".into(),
            },
        ];

        let json = dialog_to_json(&turns).unwrap();
        let back = dialog_from_json(&json).unwrap();
        assert_eq!(turns, back);
    }

    #[test]
    fn corrupt_dialog_is_rejected() {
        assert!(dialog_from_json("{not json").is_err());
        assert!(dialog_from_json(r#"[{"speaker":"narrator","text":"hi"}]"#).is_err());
    }

    #[test]
    fn initiator_parses_both_sides() {
        assert_eq!(Initiator::parse("companion").unwrap(), Initiator::Companion);
        assert_eq!(Initiator::parse("contact").unwrap(), Initiator::Contact);
        assert!(Initiator::parse("user").is_err());
    }
}
