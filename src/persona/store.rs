// src/persona/store.rs

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::slug::slugify;
use super::starter::{STARTER_PERSONA_AGE, STARTER_PERSONA_NAME, STARTER_PERSONA_PROMPT};
use super::types::{CreatePatientActor, PatientActor, UpdatePatientActor};
use crate::error::{AppError, AppResult};
use crate::prompt::{RevelationLevel, StructuredProfile};

pub struct PersonaStore {
    pool: SqlitePool,
}

impl PersonaStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a patient actor owned by `owner_id`, assigning a unique slug
    /// derived from the name.
    pub async fn create(
        &self,
        owner_id: &str,
        data: CreatePatientActor,
    ) -> AppResult<PatientActor> {
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Patient actor name is required"));
        }
        if data.age < 1 {
            return Err(AppError::validation("Patient actor age must be positive"));
        }

        let slug = self.assign_unique_slug(&slugify(&data.name)).await?;
        self.insert(owner_id, &data, &slug).await
    }

    /// One-time starter persona for a new account. Slug is derived from
    /// the user id so every account gets its own copy.
    pub async fn create_starter(&self, owner_id: &str) -> AppResult<PatientActor> {
        let suffix: String = owner_id
            .chars()
            .rev()
            .take(6)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let slug = format!("philip-walters-{suffix}");

        let data = CreatePatientActor {
            name: STARTER_PERSONA_NAME.to_string(),
            age: STARTER_PERSONA_AGE,
            is_public: true,
            prompt: STARTER_PERSONA_PROMPT.to_string(),
            profile: StructuredProfile::default(),
        };
        self.insert(owner_id, &data, &slug).await
    }

    /// Append `-1`, `-2`, ... until the slug is free. Retried
    /// synchronously against the store; slugs are immutable afterwards.
    async fn assign_unique_slug(&self, base: &str) -> AppResult<String> {
        let mut candidate = base.to_string();
        let mut counter = 1;
        while self.slug_exists(&candidate).await? {
            candidate = format!("{base}-{counter}");
            counter += 1;
        }
        Ok(candidate)
    }

    async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM patient_actors WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn insert(
        &self,
        owner_id: &str,
        data: &CreatePatientActor,
        slug: &str,
    ) -> AppResult<PatientActor> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let profile = &data.profile;

        sqlx::query(
            r#"
            INSERT INTO patient_actors (
                id, owner_id, name, age, slug, is_public, prompt,
                demographics, chief_complaint, medical_history, medications,
                social_history, personality, physical_findings, additional_symptoms,
                revelation_level, stay_in_character, avoid_medical_jargon,
                provide_feedback, custom_instructions, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&data.name)
        .bind(data.age)
        .bind(slug)
        .bind(data.is_public)
        .bind(&data.prompt)
        .bind(&profile.demographics)
        .bind(&profile.chief_complaint)
        .bind(&profile.medical_history)
        .bind(&profile.medications)
        .bind(&profile.social_history)
        .bind(&profile.personality)
        .bind(&profile.physical_findings)
        .bind(&profile.additional_symptoms)
        .bind(profile.revelation_level.to_string())
        .bind(profile.stay_in_character)
        .bind(profile.avoid_medical_jargon)
        .bind(profile.provide_feedback)
        .bind(&profile.custom_instructions)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(&id)
            .await?
            .ok_or_else(|| AppError::not_found("Patient actor not found"))
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<PatientActor>> {
        let row = sqlx::query("SELECT * FROM patient_actors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(row_to_actor))
    }

    /// Owner-gated read: distinguishes absent (NotFound) from
    /// someone-else's (Forbidden).
    pub async fn get_owned(&self, id: &str, owner_id: &str) -> AppResult<PatientActor> {
        let actor = self
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Patient actor not found"))?;
        if actor.owner_id != owner_id {
            return Err(AppError::forbidden(
                "Unauthorized: You don't own this patient actor",
            ));
        }
        Ok(actor)
    }

    /// Public slug lookup. Private personas present as not-found so their
    /// existence never leaks to unauthenticated callers.
    pub async fn get_by_slug_public(&self, slug: &str) -> AppResult<PatientActor> {
        let row = sqlx::query("SELECT * FROM patient_actors WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        match row.map(row_to_actor) {
            Some(actor) if actor.is_public => Ok(actor),
            _ => Err(AppError::not_found("Patient actor not found")),
        }
    }

    pub async fn list_mine(&self, owner_id: &str) -> AppResult<Vec<PatientActor>> {
        let rows =
            sqlx::query("SELECT * FROM patient_actors WHERE owner_id = ? ORDER BY created_at DESC")
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(row_to_actor).collect())
    }

    /// Partial-field patch. The slug is never recomputed.
    pub async fn update(
        &self,
        id: &str,
        owner_id: &str,
        patch: UpdatePatientActor,
    ) -> AppResult<PatientActor> {
        let mut actor = self.get_owned(id, owner_id).await?;

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Patient actor name is required"));
            }
            actor.name = name;
        }
        if let Some(age) = patch.age {
            if age < 1 {
                return Err(AppError::validation("Patient actor age must be positive"));
            }
            actor.age = age;
        }
        if let Some(is_public) = patch.is_public {
            actor.is_public = is_public;
        }
        if let Some(prompt) = patch.prompt {
            actor.prompt = prompt;
        }

        let profile = &mut actor.profile;
        if let Some(v) = patch.demographics {
            profile.demographics = v;
        }
        if let Some(v) = patch.chief_complaint {
            profile.chief_complaint = v;
        }
        if let Some(v) = patch.medical_history {
            profile.medical_history = v;
        }
        if let Some(v) = patch.medications {
            profile.medications = v;
        }
        if let Some(v) = patch.social_history {
            profile.social_history = v;
        }
        if let Some(v) = patch.personality {
            profile.personality = v;
        }
        if let Some(v) = patch.physical_findings {
            profile.physical_findings = v;
        }
        if let Some(v) = patch.additional_symptoms {
            profile.additional_symptoms = v;
        }
        if let Some(v) = patch.revelation_level {
            profile.revelation_level = v;
        }
        if let Some(v) = patch.stay_in_character {
            profile.stay_in_character = v;
        }
        if let Some(v) = patch.avoid_medical_jargon {
            profile.avoid_medical_jargon = v;
        }
        if let Some(v) = patch.provide_feedback {
            profile.provide_feedback = v;
        }
        if let Some(v) = patch.custom_instructions {
            profile.custom_instructions = v;
        }

        actor.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE patient_actors SET
                name = ?, age = ?, is_public = ?, prompt = ?,
                demographics = ?, chief_complaint = ?, medical_history = ?,
                medications = ?, social_history = ?, personality = ?,
                physical_findings = ?, additional_symptoms = ?,
                revelation_level = ?, stay_in_character = ?,
                avoid_medical_jargon = ?, provide_feedback = ?,
                custom_instructions = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&actor.name)
        .bind(actor.age)
        .bind(actor.is_public)
        .bind(&actor.prompt)
        .bind(&actor.profile.demographics)
        .bind(&actor.profile.chief_complaint)
        .bind(&actor.profile.medical_history)
        .bind(&actor.profile.medications)
        .bind(&actor.profile.social_history)
        .bind(&actor.profile.personality)
        .bind(&actor.profile.physical_findings)
        .bind(&actor.profile.additional_symptoms)
        .bind(actor.profile.revelation_level.to_string())
        .bind(actor.profile.stay_in_character)
        .bind(actor.profile.avoid_medical_jargon)
        .bind(actor.profile.provide_feedback)
        .bind(&actor.profile.custom_instructions)
        .bind(actor.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(actor)
    }

    /// Delete an owned persona and its rubric. Sessions that reference
    /// the persona are left in place.
    pub async fn delete(&self, id: &str, owner_id: &str) -> AppResult<()> {
        self.get_owned(id, owner_id).await?;

        sqlx::query("DELETE FROM grading_rubrics WHERE patient_actor_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM patient_actors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

pub(crate) fn row_to_actor(row: SqliteRow) -> PatientActor {
    PatientActor {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        age: row.get("age"),
        slug: row.get("slug"),
        is_public: row.get("is_public"),
        prompt: row.get("prompt"),
        profile: StructuredProfile {
            demographics: row.get("demographics"),
            chief_complaint: row.get("chief_complaint"),
            medical_history: row.get("medical_history"),
            medications: row.get("medications"),
            social_history: row.get("social_history"),
            personality: row.get("personality"),
            physical_findings: row.get("physical_findings"),
            additional_symptoms: row.get("additional_symptoms"),
            revelation_level: row
                .get::<String, _>("revelation_level")
                .parse()
                .unwrap_or(RevelationLevel::Moderate),
            stay_in_character: row.get("stay_in_character"),
            avoid_medical_jargon: row.get("avoid_medical_jargon"),
            provide_feedback: row.get("provide_feedback"),
            custom_instructions: row.get("custom_instructions"),
        },
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    }
}
