// src/state.rs

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::auth::AuthStore;
use crate::chat::ResponseGateway;
use crate::config::CONFIG;
use crate::llm::LanguageModel;
use crate::persona::PersonaStore;
use crate::rubric::RubricStore;
use crate::session::debounce::Debouncer;
use crate::session::SessionStore;
use crate::submission::SubmissionStore;

#[derive(Clone)]
pub struct AppState {
    // -------- Storage --------
    pub auth_store: Arc<AuthStore>,
    pub persona_store: Arc<PersonaStore>,
    pub session_store: Arc<SessionStore>,
    pub submission_store: Arc<SubmissionStore>,
    pub rubric_store: Arc<RubricStore>,

    // -------- Services --------
    pub gateway: Arc<ResponseGateway>,
    pub save_debouncer: Debouncer,
}

impl AppState {
    pub fn new(pool: SqlitePool, model: Arc<dyn LanguageModel>) -> Self {
        Self::with_debounce_window(pool, model, Duration::from_millis(CONFIG.save_debounce_ms))
    }

    /// Tests shrink the debounce window instead of waiting out the
    /// production one.
    pub fn with_debounce_window(
        pool: SqlitePool,
        model: Arc<dyn LanguageModel>,
        window: Duration,
    ) -> Self {
        let persona_store = Arc::new(PersonaStore::new(pool.clone()));
        let gateway = Arc::new(ResponseGateway::new(Arc::clone(&persona_store), model));

        Self {
            auth_store: Arc::new(AuthStore::new(pool.clone())),
            persona_store,
            session_store: Arc::new(SessionStore::new(pool.clone())),
            submission_store: Arc::new(SubmissionStore::new(pool.clone())),
            rubric_store: Arc::new(RubricStore::new(pool)),
            gateway,
            save_debouncer: Debouncer::new(window),
        }
    }
}
