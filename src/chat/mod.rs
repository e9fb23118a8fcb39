// src/chat/mod.rs

pub mod gateway;
pub mod handlers;

pub use gateway::{FALLBACK_MESSAGE, GREETING_MESSAGE, ResponseGateway};
