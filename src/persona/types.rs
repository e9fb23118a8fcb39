// src/persona/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prompt::{self, StructuredProfile};

/// A configured simulated-patient profile driving the model's role-play.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientActor {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub age: i64,
    pub slug: String,
    pub is_public: bool,
    /// Legacy free-text system prompt. When non-empty it takes precedence
    /// over the structured profile.
    pub prompt: String,
    #[serde(flatten)]
    pub profile: StructuredProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientActor {
    /// The system prompt handed to the language model: the legacy raw
    /// prompt when present, otherwise the compiled structured profile.
    pub fn system_prompt(&self) -> String {
        if !self.prompt.is_empty() {
            self.prompt.clone()
        } else {
            prompt::compile(&self.profile)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientActor {
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub prompt: String,
    #[serde(flatten)]
    pub profile: StructuredProfile,
}

/// Partial-field patch. `None` leaves a field untouched; the slug is
/// never recomputed on update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientActor {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub is_public: Option<bool>,
    pub prompt: Option<String>,
    pub demographics: Option<String>,
    pub chief_complaint: Option<String>,
    pub medical_history: Option<String>,
    pub medications: Option<String>,
    pub social_history: Option<String>,
    pub personality: Option<String>,
    pub physical_findings: Option<String>,
    pub additional_symptoms: Option<String>,
    pub revelation_level: Option<crate::prompt::RevelationLevel>,
    pub stay_in_character: Option<bool>,
    pub avoid_medical_jargon: Option<bool>,
    pub provide_feedback: Option<bool>,
    pub custom_instructions: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::RevelationLevel;

    fn actor(prompt: &str, demographics: &str) -> PatientActor {
        PatientActor {
            id: "pa_1".to_string(),
            owner_id: "u_1".to_string(),
            name: "Test".to_string(),
            age: 55,
            slug: "test".to_string(),
            is_public: false,
            prompt: prompt.to_string(),
            profile: StructuredProfile {
                demographics: demographics.to_string(),
                revelation_level: RevelationLevel::Moderate,
                ..Default::default()
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn legacy_prompt_takes_precedence() {
        let actor = actor("You are Philip Walters.", "55-year-old male");
        assert_eq!(actor.system_prompt(), "You are Philip Walters.");
    }

    #[test]
    fn structured_profile_compiles_when_no_legacy_prompt() {
        let actor = actor("", "55-year-old male");
        assert!(
            actor
                .system_prompt()
                .contains("**Demographics:** 55-year-old male")
        );
    }
}
