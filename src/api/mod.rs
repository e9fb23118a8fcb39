// src/api/mod.rs

pub mod error;
mod router;

pub use router::router;
