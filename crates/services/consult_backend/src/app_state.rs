// --- File: crates/services/consult_backend/src/app_state.rs ---
use consult_auth::TokenKeys;
use consult_common::logging::log_result;
use consult_common::{ConsultError, DB_UNAVAILABLE_MESSAGE};
use consult_config::AppConfig;
use consult_db::Store;
use consult_lecturer::LecturerState;
use consult_student::StudentState;
use std::sync::Arc;
use tracing::warn;

/// Everything the routers share: configuration, the optional store and the
/// token keys.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// `None` when no database is configured or it could not be reached.
    pub store: Option<Store>,
    pub keys: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, store: Option<Store>) -> Self {
        let keys = Arc::new(TokenKeys::from_config(&config.auth));
        Self {
            config,
            store,
            keys,
        }
    }

    /// Builds the state, connecting to the configured database.
    ///
    /// A missing or unreachable database is logged and the state is built
    /// without a store, so the server still starts.
    pub async fn connect(config: Arc<AppConfig>) -> Self {
        let store = connect_store(&config).await;
        Self::new(config, store)
    }

    pub fn store(&self) -> Result<&Store, ConsultError> {
        self.store
            .as_ref()
            .ok_or_else(|| ConsultError::UnavailableError(DB_UNAVAILABLE_MESSAGE.to_string()))
    }

    pub fn student_state(&self) -> Arc<StudentState> {
        Arc::new(StudentState {
            config: self.config.clone(),
            store: self.store.clone(),
            keys: self.keys.clone(),
        })
    }

    pub fn lecturer_state(&self) -> Arc<LecturerState> {
        Arc::new(LecturerState {
            config: self.config.clone(),
            store: self.store.clone(),
            keys: self.keys.clone(),
        })
    }
}

async fn connect_store(config: &AppConfig) -> Option<Store> {
    let Some(db_config) = config.database.as_ref() else {
        warn!("No database configured; data endpoints will answer 503");
        return None;
    };

    let store = log_result(
        Store::connect(db_config).await,
        "Database connected",
        "Database connection failed, continuing without it",
    )
    .ok()?;

    log_result(
        store.init_schema().await,
        "Database schema initialized",
        "Database schema initialization failed, continuing without it",
    )
    .ok()?;

    Some(store)
}
