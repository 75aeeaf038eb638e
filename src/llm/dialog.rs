// src/llm/dialog.rs
// Dialog generation seam for the social interaction processor. The live
// implementation prompts an OpenAI-compatible model for a short JSON-shaped
// conversation; tests substitute a scripted generator through the trait.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AyuniError, Result};
use crate::llm::client::TextGenClient;
use crate::social::types::{DialogTurn, Initiator};

/// Everything the generator needs to stage one interaction.
#[derive(Debug, Clone)]
pub struct InteractionRequest {
    pub companion_name: String,
    pub companion_persona: String,
    pub contact_name: String,
    pub contact_relation: String,
    pub initiated_by: Initiator,
}

/// A generated conversation plus the companion's optional inner monologue.
#[derive(Debug, Clone)]
pub struct GeneratedInteraction {
    pub turns: Vec<DialogTurn>,
    pub thoughts: Option<String>,
}

#[async_trait]
pub trait DialogGenerator: Send + Sync {
    async fn generate_interaction(
        &self,
        request: &InteractionRequest,
    ) -> Result<GeneratedInteraction>;
}

/// Wire shape the model is asked to produce.
#[derive(Debug, Deserialize)]
struct DialogResponse {
    dialog: Vec<DialogTurn>,
    #[serde(default)]
    thoughts: Option<String>,
}

pub struct LlmDialogGenerator {
    client: TextGenClient,
}

impl LlmDialogGenerator {
    pub fn new(client: TextGenClient) -> Self {
        Self { client }
    }

    fn system_prompt() -> &'static str {
        "You write short, natural conversations between an AI companion and one of \
         their acquaintances. Respond with JSON only: \
         {\"dialog\": [{\"speaker\": \"companion\"|\"contact\", \"text\": \"...\"}], \
         \"thoughts\": \"companion's private reflection, optional\"}. \
         Keep it to 4-8 turns."
    }

    fn user_prompt(request: &InteractionRequest) -> String {
        let opener = match request.initiated_by {
            Initiator::Companion => "The companion reaches out first.",
            Initiator::Contact => "The contact reaches out first.",
        };
        format!(
            "Companion: {} - {}\nContact: {} ({})\n{}",
            request.companion_name,
            request.companion_persona,
            request.contact_name,
            request.contact_relation,
            opener,
        )
    }

    fn parse(raw: &str) -> Result<GeneratedInteraction> {
        // Models occasionally wrap JSON in code fences
        let trimmed = raw
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        let response: DialogResponse = serde_json::from_str(trimmed)
            .map_err(|e| AyuniError::external(format!("unparseable dialog response: {e}")))?;

        if response.dialog.is_empty() {
            return Err(AyuniError::external("generator returned an empty dialog"));
        }

        Ok(GeneratedInteraction {
            turns: response.dialog,
            thoughts: response.thoughts.filter(|t| !t.trim().is_empty()),
        })
    }
}

#[async_trait]
impl DialogGenerator for LlmDialogGenerator {
    async fn generate_interaction(
        &self,
        request: &InteractionRequest,
    ) -> Result<GeneratedInteraction> {
        debug!(
            "Generating {} interaction for {} with {}",
            request.initiated_by.as_str(),
            request.companion_name,
            request.contact_name
        );

        let raw = self
            .client
            .chat(Self::system_prompt(), &Self::user_prompt(request))
            .await
            .map_err(|e| AyuniError::external(format!("dialog generation failed: {e:#}")))?;

        Self::parse(&raw)
    }
}
