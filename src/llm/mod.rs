// src/llm/mod.rs
// External language-model collaborator: an opaque, fallible function from
// system prompt + ordered history to assistant text.

pub mod client;

pub use client::GeminiClient;

use async_trait::async_trait;

use crate::session::types::Message;

/// Contract for the external model. The gateway depends on this trait so
/// tests can substitute a scripted model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate one assistant turn. Any downstream fault (auth, quota,
    /// network, content policy) surfaces as a generic invocation error.
    async fn generate(&self, system_prompt: &str, history: &[Message]) -> anyhow::Result<String>;
}
