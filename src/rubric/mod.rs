// src/rubric/mod.rs

pub mod handlers;
pub mod store;
pub mod types;

pub use store::RubricStore;
pub use types::{GradingRubric, RubricCategory, RubricData, standard_osce_rubric};
