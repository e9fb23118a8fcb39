// src/prompt/mod.rs
// Structured-prompt compiler: clinical profile -> system prompt, and the
// best-effort reverse extraction used to migrate legacy free-text prompts.

pub mod compiler;
pub mod extract;

pub use compiler::{RevelationLevel, StructuredProfile, compile};
pub use extract::extract;
