// src/persona/mod.rs
// Patient-actor registry: structured clinical profiles, slug assignment,
// ownership and visibility rules.

pub mod handlers;
pub mod slug;
pub mod starter;
pub mod store;
pub mod types;

pub use starter::STARTER_PERSONA_PROMPT;
pub use store::PersonaStore;
pub use types::{CreatePatientActor, PatientActor, UpdatePatientActor};
