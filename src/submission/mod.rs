// src/submission/mod.rs
// Submission & review workflow: routing a finished session to an
// instructor and attaching feedback and a grade.

pub mod handlers;
pub mod store;
pub mod types;

pub use store::SubmissionStore;
pub use types::{SubmissionStatus, SubmissionView, SubmittedSession};
