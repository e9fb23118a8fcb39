// src/submission/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Instructor;
use crate::session::types::PatientActorBrief;

/// Submission lifecycle. Grade presence is the sole status determinant,
/// recomputed on every feedback save: a graded submission re-saved
/// without a grade reverts to reviewed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Reviewed,
    Graded,
}

impl SubmissionStatus {
    /// Status implied by a feedback save with or without a grade.
    pub fn from_grade(grade: Option<&str>) -> Self {
        match grade {
            Some(g) if !g.is_empty() => SubmissionStatus::Graded,
            _ => SubmissionStatus::Reviewed,
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Reviewed => write!(f, "reviewed"),
            SubmissionStatus::Graded => write!(f, "graded"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "reviewed" => Ok(SubmissionStatus::Reviewed),
            "graded" => Ok(SubmissionStatus::Graded),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// A session routed to an instructor for review/grading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedSession {
    pub id: String,
    pub chat_session_id: String,
    pub instructor_id: String,
    pub status: SubmissionStatus,
    pub feedback: Option<String>,
    pub grade: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Submission as embedded in a session detail view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    pub id: String,
    pub status: SubmissionStatus,
    pub feedback: Option<String>,
    pub grade: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub instructor: Instructor,
}

/// Student identity surfaced on an instructor's submission queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentBrief {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// An instructor's queue row: submission plus the student and persona
/// behind the submitted session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListing {
    #[serde(flatten)]
    pub submission: SubmittedSession,
    pub student: StudentBrief,
    pub patient_actor: Option<PatientActorBrief>,
    pub message_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            SubmissionStatus::Pending,
            SubmissionStatus::Reviewed,
            SubmissionStatus::Graded,
        ] {
            let parsed: SubmissionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn grade_presence_determines_status() {
        assert_eq!(
            SubmissionStatus::from_grade(Some("A-")),
            SubmissionStatus::Graded
        );
        assert_eq!(
            SubmissionStatus::from_grade(Some("")),
            SubmissionStatus::Reviewed
        );
        assert_eq!(
            SubmissionStatus::from_grade(None),
            SubmissionStatus::Reviewed
        );
    }
}
