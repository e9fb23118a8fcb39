// src/llm/client.rs
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;

use super::LanguageModel;
use crate::session::types::{Message, Role};

/// Client for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiClient {
    pub client: Client,
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, api_base: String, model: String, timeout_secs: u64) -> Result<Self> {
        if api_key.is_empty() {
            return Err(anyhow!(
                "Google Generative AI API key is not configured. Set GOOGLE_GENERATIVE_AI_API_KEY."
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            api_base,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    /// Map our message roles onto Gemini's `user`/`model` content roles.
    fn history_payload(history: &[Message]) -> Vec<Value> {
        history
            .iter()
            .map(|message| {
                let role = match message.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                json!({
                    "role": role,
                    "parts": [{ "text": message.content }],
                })
            })
            .collect()
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, system_prompt: &str, history: &[Message]) -> Result<String> {
        let payload = json!({
            "systemInstruction": {
                "parts": [{ "text": system_prompt }],
            },
            "contents": Self::history_payload(history),
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Failed to send generateContent request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("Gemini API error {}: {}", status, error_text));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse generateContent response")?;

        body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|text| text.to_string())
            .ok_or_else(|| anyhow!("Gemini response contained no text candidate"))
    }
}
