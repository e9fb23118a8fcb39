// src/session/store.rs

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::types::{
    ChatSession, Message, PatientActorBrief, SessionDetail, SessionSummary, SubmissionBrief,
};
use crate::auth::Instructor;
use crate::error::{AppError, AppResult};
use crate::submission::{SubmissionStatus, SubmissionView};

pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an empty session for an authenticated student. Guests never
    /// reach this: public chat is stateless by design.
    pub async fn create(&self, user_id: &str, patient_actor_id: &str) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO chat_sessions
                (id, user_id, patient_actor_id, messages, message_count, started_at, last_message_at)
            VALUES (?, ?, ?, '[]', 0, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(patient_actor_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Replace the stored message list with the full cumulative list
    /// supplied by the caller. Replace semantics, not append: the client
    /// owns the in-flight conversation and persists snapshots of it.
    /// Concurrent writers race; last write wins.
    pub async fn replace_messages(
        &self,
        session_id: &str,
        user_id: &str,
        messages: &[Message],
    ) -> AppResult<()> {
        let session = self
            .get(session_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))?;

        if session.user_id != user_id {
            return Err(AppError::forbidden(
                "Unauthorized: This session does not belong to you",
            ));
        }

        let payload = serde_json::to_string(messages)
            .map_err(|e| AppError::validation(format!("Invalid message list: {e}")))?;

        sqlx::query(
            "UPDATE chat_sessions SET messages = ?, message_count = ?, last_message_at = ? WHERE id = ?",
        )
        .bind(payload)
        .bind(messages.len() as i64)
        .bind(Utc::now())
        .bind(session_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, session_id: &str) -> AppResult<Option<ChatSession>> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(row_to_session))
    }

    /// Full session view, permitted to its owner or to the instructor of
    /// its linked submission.
    pub async fn get_detail(&self, session_id: &str, caller_id: &str) -> AppResult<SessionDetail> {
        let session = self
            .get(session_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))?;

        let submission = self.submission_view(session_id).await?;

        let is_owner = session.user_id == caller_id;
        let is_assigned_instructor = submission
            .as_ref()
            .is_some_and(|s| s.instructor.id == caller_id);
        if !is_owner && !is_assigned_instructor {
            return Err(AppError::forbidden(
                "Unauthorized: You cannot view this session",
            ));
        }

        // The persona may have been deleted since the session was recorded
        let patient_actor = sqlx::query("SELECT * FROM patient_actors WHERE id = ?")
            .bind(&session.patient_actor_id)
            .fetch_optional(&self.pool)
            .await?
            .map(crate::persona::store::row_to_actor);

        Ok(SessionDetail {
            session,
            patient_actor,
            submission,
        })
    }

    /// A student's sessions, newest activity first, joined with persona
    /// and submission status.
    pub async fn list_for_student(&self, user_id: &str) -> AppResult<Vec<SessionSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT
                s.id, s.message_count, s.started_at, s.last_message_at,
                p.id AS pa_id, p.name AS pa_name, p.age AS pa_age,
                sub.id AS sub_id, sub.status AS sub_status,
                sub.submitted_at AS sub_submitted_at,
                sub.grade AS sub_grade, sub.feedback AS sub_feedback
            FROM chat_sessions s
            LEFT JOIN patient_actors p ON p.id = s.patient_actor_id
            LEFT JOIN submitted_sessions sub ON sub.chat_session_id = s.id
            WHERE s.user_id = ?
            ORDER BY s.last_message_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let patient_actor =
                    row.get::<Option<String>, _>("pa_id")
                        .map(|id| PatientActorBrief {
                            id,
                            name: row.get("pa_name"),
                            age: row.get("pa_age"),
                        });
                let submission = row
                    .get::<Option<String>, _>("sub_id")
                    .map(|id| SubmissionBrief {
                        id,
                        status: row
                            .get::<String, _>("sub_status")
                            .parse()
                            .unwrap_or(SubmissionStatus::Pending),
                        submitted_at: row.get("sub_submitted_at"),
                        grade: row.get("sub_grade"),
                        feedback: row.get("sub_feedback"),
                    });
                SessionSummary {
                    id: row.get("id"),
                    patient_actor,
                    message_count: row.get("message_count"),
                    started_at: row.get("started_at"),
                    last_message_at: row.get("last_message_at"),
                    submission,
                }
            })
            .collect())
    }

    async fn submission_view(&self, session_id: &str) -> AppResult<Option<SubmissionView>> {
        let row = sqlx::query(
            r#"
            SELECT sub.id, sub.status, sub.feedback, sub.grade,
                   sub.submitted_at, sub.reviewed_at,
                   u.id AS instructor_id, u.name AS instructor_name,
                   u.email AS instructor_email
            FROM submitted_sessions sub
            JOIN users u ON u.id = sub.instructor_id
            WHERE sub.chat_session_id = ?
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| SubmissionView {
            id: row.get("id"),
            status: row
                .get::<String, _>("status")
                .parse()
                .unwrap_or(SubmissionStatus::Pending),
            feedback: row.get("feedback"),
            grade: row.get("grade"),
            submitted_at: row.get("submitted_at"),
            reviewed_at: row.get("reviewed_at"),
            instructor: Instructor {
                id: row.get("instructor_id"),
                name: row.get("instructor_name"),
                email: row.get("instructor_email"),
            },
        }))
    }
}

fn row_to_session(row: SqliteRow) -> ChatSession {
    let raw: String = row.get("messages");
    let messages: Vec<Message> = serde_json::from_str(&raw).unwrap_or_default();

    ChatSession {
        id: row.get("id"),
        user_id: row.get("user_id"),
        patient_actor_id: row.get("patient_actor_id"),
        messages,
        message_count: row.get("message_count"),
        started_at: row.get::<DateTime<Utc>, _>("started_at"),
        last_message_at: row.get::<DateTime<Utc>, _>("last_message_at"),
    }
}
