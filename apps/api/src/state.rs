use std::sync::Arc;

use crate::auth::session::SessionKeys;
use crate::config::Config;
use crate::errors::AppError;
use crate::store::GymStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the service booted without a database; decided once at startup.
    pub store: Option<Arc<dyn GymStore>>,
    pub sessions: SessionKeys,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn GymStore>>, config: Config) -> Self {
        let sessions = SessionKeys::new(&config.session_secret, config.session_ttl_secs);
        Self {
            store,
            sessions,
            config,
        }
    }

    /// The persistence handle, or `DatabaseUnavailable` when none was configured.
    pub fn store(&self) -> Result<&dyn GymStore, AppError> {
        self.store.as_deref().ok_or(AppError::DatabaseUnavailable)
    }
}
