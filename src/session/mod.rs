// src/session/mod.rs
// Conversation sessions: append-only message logs for one student/persona
// pairing, with debounced persistence for the chat path.

pub mod debounce;
pub mod handlers;
pub mod store;
pub mod types;

pub use debounce::Debouncer;
pub use store::SessionStore;
pub use types::{ChatSession, Message, Role};
