// src/rubric/store.rs

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::types::{GradingRubric, RubricData};
use crate::error::{AppError, AppResult};

pub struct RubricStore {
    pool: SqlitePool,
}

impl RubricStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_for_persona(
        &self,
        patient_actor_id: &str,
    ) -> AppResult<Option<GradingRubric>> {
        let row = sqlx::query("SELECT * FROM grading_rubrics WHERE patient_actor_id = ?")
            .bind(patient_actor_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_rubric).transpose()
    }

    /// Create or replace the persona's rubric. `total_points` is always
    /// recomputed from the categories, ignoring the client's value.
    pub async fn upsert(
        &self,
        patient_actor_id: &str,
        data: RubricData,
    ) -> AppResult<GradingRubric> {
        data.validate()?;

        let total_points = data.computed_total();
        let categories = serde_json::to_string(&data.categories)
            .map_err(|e| AppError::validation(format!("Invalid rubric categories: {e}")))?;
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO grading_rubrics
                (id, patient_actor_id, categories, total_points,
                 passing_threshold, auto_grade_enabled, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(patient_actor_id) DO UPDATE SET
                categories = excluded.categories,
                total_points = excluded.total_points,
                passing_threshold = excluded.passing_threshold,
                auto_grade_enabled = excluded.auto_grade_enabled,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&id)
        .bind(patient_actor_id)
        .bind(&categories)
        .bind(total_points)
        .bind(data.passing_threshold)
        .bind(data.auto_grade_enabled)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let saved = self
            .get_for_persona(patient_actor_id)
            .await?
            .ok_or_else(|| AppError::not_found("Rubric not found"))?;
        Ok(saved)
    }

    /// Idempotent: deleting a persona with no rubric is not an error.
    pub async fn delete_for_persona(&self, patient_actor_id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM grading_rubrics WHERE patient_actor_id = ?")
            .bind(patient_actor_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn row_to_rubric(row: SqliteRow) -> AppResult<GradingRubric> {
    let categories: String = row.get("categories");
    let categories = serde_json::from_str(&categories)
        .map_err(|e| AppError::Database(sqlx::Error::Decode(Box::new(e))))?;
    Ok(GradingRubric {
        id: row.get("id"),
        patient_actor_id: row.get("patient_actor_id"),
        categories,
        total_points: row.get("total_points"),
        passing_threshold: row.get("passing_threshold"),
        auto_grade_enabled: row.get("auto_grade_enabled"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    })
}
