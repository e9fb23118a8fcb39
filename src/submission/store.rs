// src/submission/store.rs

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::types::{StudentBrief, SubmissionListing, SubmissionStatus, SubmittedSession};
use crate::auth::Role;
use crate::error::{AppError, AppResult};
use crate::session::types::PatientActorBrief;

pub struct SubmissionStore {
    pool: SqlitePool,
}

impl SubmissionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// `none -> pending`: a student submits an owned, not-yet-submitted
    /// session to a chosen instructor.
    pub async fn submit(
        &self,
        session_id: &str,
        student_id: &str,
        instructor_id: &str,
    ) -> AppResult<SubmittedSession> {
        let session = sqlx::query("SELECT user_id FROM chat_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))?;

        if session.get::<String, _>("user_id") != student_id {
            return Err(AppError::forbidden(
                "Unauthorized: This session does not belong to you",
            ));
        }

        let existing = sqlx::query("SELECT 1 FROM submitted_sessions WHERE chat_session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::conflict(
                "This session has already been submitted",
            ));
        }

        let instructor = sqlx::query("SELECT role FROM users WHERE id = ?")
            .bind(instructor_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Instructor not found"))?;
        let role: Role = instructor
            .get::<String, _>("role")
            .parse()
            .unwrap_or(Role::Student);
        if !role.can_review() {
            return Err(AppError::validation(
                "The specified user is not an instructor",
            ));
        }

        let id = Uuid::new_v4().to_string();
        let submitted_at = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO submitted_sessions
                (id, chat_session_id, instructor_id, status, submitted_at)
            VALUES (?, ?, ?, 'pending', ?)
            "#,
        )
        .bind(&id)
        .bind(session_id)
        .bind(instructor_id)
        .bind(submitted_at)
        .execute(&self.pool)
        .await?;

        Ok(SubmittedSession {
            id,
            chat_session_id: session_id.to_string(),
            instructor_id: instructor_id.to_string(),
            status: SubmissionStatus::Pending,
            feedback: None,
            grade: None,
            submitted_at,
            reviewed_at: None,
        })
    }

    /// Save feedback (and optionally a grade) on a submission. Gated to
    /// the assigned instructor. Status is recomputed from grade presence
    /// on every save; the review timestamp is set at each transition.
    pub async fn update_feedback(
        &self,
        submission_id: &str,
        instructor_id: &str,
        feedback: &str,
        grade: Option<&str>,
    ) -> AppResult<SubmittedSession> {
        let submission = self
            .get(submission_id)
            .await?
            .ok_or_else(|| AppError::not_found("Submission not found"))?;

        if submission.instructor_id != instructor_id {
            return Err(AppError::forbidden(
                "Unauthorized: This submission is not assigned to you",
            ));
        }

        let status = SubmissionStatus::from_grade(grade);
        let grade = grade.filter(|g| !g.is_empty());
        let reviewed_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE submitted_sessions
            SET feedback = ?, grade = ?, status = ?, reviewed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(feedback)
        .bind(grade)
        .bind(status.to_string())
        .bind(reviewed_at)
        .bind(submission_id)
        .execute(&self.pool)
        .await?;

        Ok(SubmittedSession {
            feedback: Some(feedback.to_string()),
            grade: grade.map(|g| g.to_string()),
            status,
            reviewed_at: Some(reviewed_at),
            ..submission
        })
    }

    pub async fn get(&self, submission_id: &str) -> AppResult<Option<SubmittedSession>> {
        let row = sqlx::query("SELECT * FROM submitted_sessions WHERE id = ?")
            .bind(submission_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(row_to_submission))
    }

    /// An instructor's queue, newest first, optionally filtered by
    /// persona. Role is checked by the caller.
    pub async fn list_for_instructor(
        &self,
        instructor_id: &str,
        patient_actor_id: Option<&str>,
    ) -> AppResult<Vec<SubmissionListing>> {
        let base = r#"
            SELECT
                sub.id, sub.chat_session_id, sub.instructor_id, sub.status,
                sub.feedback, sub.grade, sub.submitted_at, sub.reviewed_at,
                s.message_count,
                stu.id AS student_id, stu.name AS student_name, stu.email AS student_email,
                p.id AS pa_id, p.name AS pa_name, p.age AS pa_age
            FROM submitted_sessions sub
            JOIN chat_sessions s ON s.id = sub.chat_session_id
            JOIN users stu ON stu.id = s.user_id
            LEFT JOIN patient_actors p ON p.id = s.patient_actor_id
            WHERE sub.instructor_id = ?
        "#;

        let rows = match patient_actor_id {
            Some(pa_id) => {
                let query = format!(
                    "{base} AND s.patient_actor_id = ? ORDER BY sub.submitted_at DESC"
                );
                sqlx::query(&query)
                    .bind(instructor_id)
                    .bind(pa_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("{base} ORDER BY sub.submitted_at DESC");
                sqlx::query(&query)
                    .bind(instructor_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

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
                SubmissionListing {
                    submission: SubmittedSession {
                        id: row.get("id"),
                        chat_session_id: row.get("chat_session_id"),
                        instructor_id: row.get("instructor_id"),
                        status: row
                            .get::<String, _>("status")
                            .parse()
                            .unwrap_or(SubmissionStatus::Pending),
                        feedback: row.get("feedback"),
                        grade: row.get("grade"),
                        submitted_at: row.get("submitted_at"),
                        reviewed_at: row.get("reviewed_at"),
                    },
                    student: StudentBrief {
                        id: row.get("student_id"),
                        name: row.get("student_name"),
                        email: row.get("student_email"),
                    },
                    patient_actor,
                    message_count: row.get("message_count"),
                }
            })
            .collect())
    }
}

fn row_to_submission(row: SqliteRow) -> SubmittedSession {
    SubmittedSession {
        id: row.get("id"),
        chat_session_id: row.get("chat_session_id"),
        instructor_id: row.get("instructor_id"),
        status: row
            .get::<String, _>("status")
            .parse()
            .unwrap_or(SubmissionStatus::Pending),
        feedback: row.get("feedback"),
        grade: row.get("grade"),
        submitted_at: row.get::<DateTime<Utc>, _>("submitted_at"),
        reviewed_at: row.get::<Option<DateTime<Utc>>, _>("reviewed_at"),
    }
}
