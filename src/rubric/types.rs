// src/rubric/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RubricCategory {
    pub name: String,
    pub description: String,
    pub max_points: i64,
    pub criteria: String,
}

/// Client-supplied rubric payload. `total_points` is advisory only;
/// the stored value is always recomputed from the categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricData {
    pub categories: Vec<RubricCategory>,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default)]
    pub passing_threshold: Option<i64>,
    #[serde(default)]
    pub auto_grade_enabled: bool,
}

impl RubricData {
    pub fn validate(&self) -> AppResult<()> {
        if self.categories.is_empty() {
            return Err(AppError::validation(
                "A rubric must have at least one category",
            ));
        }
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(AppError::validation("Category name is required"));
            }
            if category.description.trim().is_empty() {
                return Err(AppError::validation("Category description is required"));
            }
            if category.max_points < 1 {
                return Err(AppError::validation(
                    "Category maxPoints must be at least 1",
                ));
            }
        }
        Ok(())
    }

    pub fn computed_total(&self) -> i64 {
        self.categories.iter().map(|c| c.max_points).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingRubric {
    pub id: String,
    pub patient_actor_id: String,
    pub categories: Vec<RubricCategory>,
    pub total_points: i64,
    pub passing_threshold: Option<i64>,
    pub auto_grade_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The standard OSCE grading template.
pub fn standard_osce_rubric() -> Vec<RubricCategory> {
    vec![
        RubricCategory {
            name: "History Taking".to_string(),
            description: "Gathering relevant patient information".to_string(),
            max_points: 10,
            criteria: "Asked appropriate questions, obtained comprehensive history, followed logical sequence".to_string(),
        },
        RubricCategory {
            name: "Communication Skills".to_string(),
            description: "Interpersonal and communication abilities".to_string(),
            max_points: 10,
            criteria: "Clear communication, active listening, empathy, appropriate language level".to_string(),
        },
        RubricCategory {
            name: "Clinical Reasoning".to_string(),
            description: "Diagnostic thinking and problem-solving".to_string(),
            max_points: 10,
            criteria: "Logical differential diagnosis, appropriate follow-up questions, clinical judgment".to_string(),
        },
        RubricCategory {
            name: "Professionalism".to_string(),
            description: "Professional behavior and ethics".to_string(),
            max_points: 10,
            criteria: "Respectful manner, appropriate boundaries, ethical considerations".to_string(),
        },
        RubricCategory {
            name: "Patient Education".to_string(),
            description: "Explaining and educating the patient".to_string(),
            max_points: 10,
            criteria: "Clear explanations, checked understanding, provided appropriate guidance".to_string(),
        },
    ]
}
