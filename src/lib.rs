// src/lib.rs

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod prompt;
pub mod rubric;
pub mod server;
pub mod session;
pub mod state;
pub mod submission;
