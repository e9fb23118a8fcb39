// src/chat/gateway.rs
// Access-gated bridge between a caller's conversation history and the
// language model. The gateway itself fails closed on model errors; the
// HTTP layer decides whether to surface them or substitute the
// in-character fallback.

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{AppError, AppResult};
use crate::llm::LanguageModel;
use crate::persona::{PatientActor, PersonaStore};
use crate::session::types::Message;

/// Shown to the student when the model call fails. Keeps the simulation
/// in character instead of leaking an error page mid-encounter.
pub const FALLBACK_MESSAGE: &str =
    "I'm sorry, I'm not feeling well enough to respond right now. Could we continue this later?";

/// Canonical opening line for a fresh encounter.
pub const GREETING_MESSAGE: &str =
    "Hello, I'm here for my appointment. What can I help you with today?";

pub struct ResponseGateway {
    personas: Arc<PersonaStore>,
    model: Arc<dyn LanguageModel>,
}

impl ResponseGateway {
    pub fn new(personas: Arc<PersonaStore>, model: Arc<dyn LanguageModel>) -> Self {
        Self { personas, model }
    }

    /// Generate a reply as a persona the caller owns.
    pub async fn respond_owned(
        &self,
        persona_id: &str,
        user_id: &str,
        history: &[Message],
    ) -> AppResult<String> {
        let actor = self.personas.get_owned(persona_id, user_id).await?;
        self.generate(&actor, history).await
    }

    /// Generate a reply as a public persona, no caller identity required.
    pub async fn respond_public(&self, persona_id: &str, history: &[Message]) -> AppResult<String> {
        let actor = self
            .personas
            .get(persona_id)
            .await?
            .ok_or_else(|| AppError::not_found("Patient actor not found"))?;
        if !actor.is_public {
            return Err(AppError::forbidden(
                "This patient actor is not publicly accessible",
            ));
        }
        self.generate(&actor, history).await
    }

    async fn generate(&self, actor: &PatientActor, history: &[Message]) -> AppResult<String> {
        let system_prompt = actor.system_prompt();
        debug!(
            persona = %actor.slug,
            turns = history.len(),
            "generating patient response"
        );

        match self.model.generate(&system_prompt, history).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                error!(persona = %actor.slug, error = %e, "model request failed");
                Err(AppError::upstream(e.to_string()))
            }
        }
    }
}
