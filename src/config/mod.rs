// src/config/mod.rs
// Process-wide configuration loaded once from the environment (and .env).

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    // ── Server Configuration
    pub host: String,
    pub port: u16,

    // ── Database Configuration
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Language Model Configuration
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub model: String,
    pub model_timeout: u64,

    // ── Session Persistence
    pub save_debounce_ms: u64,

    // ── Logging Configuration
    pub log_level: String,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            clean_val.parse::<T>().unwrap_or(default)
        }
        Err(_) => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        // Load from .env file first if it exists
        let _ = dotenvy::dotenv();

        Self {
            host: env_var_or("PRECEPTOR_HOST", "127.0.0.1".to_string()),
            port: env_var_or("PRECEPTOR_PORT", 8080),
            database_url: env_var_or("DATABASE_URL", "sqlite:./preceptor.db".to_string()),
            sqlite_max_connections: env_var_or("SQLITE_MAX_CONNECTIONS", 10),
            gemini_api_key: env_var_or("GOOGLE_GENERATIVE_AI_API_KEY", String::new()),
            gemini_base_url: env_var_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta".to_string(),
            ),
            model: env_var_or("PRECEPTOR_MODEL", "gemini-2.0-flash".to_string()),
            model_timeout: env_var_or("PRECEPTOR_MODEL_TIMEOUT", 60),
            save_debounce_ms: env_var_or("PRECEPTOR_SAVE_DEBOUNCE_MS", 1000),
            log_level: env_var_or("PRECEPTOR_LOG_LEVEL", "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);
