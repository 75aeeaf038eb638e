// src/llm/client.rs
// Thin client for an OpenAI-compatible chat-completions endpoint.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::CONFIG;

#[derive(Clone)]
pub struct TextGenClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl TextGenClient {
    pub fn from_config() -> Result<Self> {
        Self::new(
            &CONFIG.textgen_base_url,
            &CONFIG.textgen_api_key,
            &CONFIG.textgen_model,
            Duration::from_secs(CONFIG.textgen_timeout),
        )
    }

    pub fn new(api_base: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// One chat completion; returns the assistant message content.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": 0.9,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Failed to send chat request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!("Text generation API error {}: {}", status, error_text));
        }

        let body: Value = response.json().await.context("Failed to parse response")?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .context("Response missing message content")?;

        Ok(content.to_string())
    }
}
