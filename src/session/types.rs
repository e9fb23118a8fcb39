// src/session/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One conversation turn. Ordering is significant and append-only within
/// a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One persisted conversation thread between a student and a persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub user_id: String,
    pub patient_actor_id: String,
    pub messages: Vec<Message>,
    pub message_count: i64,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

/// Persona fields surfaced in session listings. Optional because a
/// deleted persona leaves its sessions in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientActorBrief {
    pub id: String,
    pub name: String,
    pub age: i64,
}

/// Submission fields surfaced alongside a student's sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionBrief {
    pub id: String,
    pub status: crate::submission::SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<String>,
    pub feedback: Option<String>,
}

/// A student's session listing row: session plus persona and submission
/// status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub patient_actor: Option<PatientActorBrief>,
    pub message_count: i64,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub submission: Option<SubmissionBrief>,
}

/// Full session view for the transcript page: owner or assigned
/// instructor only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: ChatSession,
    pub patient_actor: Option<crate::persona::PatientActor>,
    pub submission: Option<crate::submission::SubmissionView>,
}
