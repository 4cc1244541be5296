use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::Config,
    db::{session_log_from_config, CredentialStore, SessionLog},
    error::AppResult,
    services::{ArchetypeEngine, EngineSettings, SessionManager},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Current model; replaced wholesale on retrain
    pub engine: Arc<RwLock<ArchetypeEngine>>,
    pub engine_settings: EngineSettings,
    pub session_log: Option<Arc<dyn SessionLog>>,
    pub credentials: CredentialStore,
    pub sessions: SessionManager,
    /// Archetype requests must carry a login session
    pub require_login: bool,
}

impl AppState {
    /// Creates state with no session log and open access
    pub fn new(
        engine: ArchetypeEngine,
        engine_settings: EngineSettings,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            engine_settings,
            session_log: None,
            credentials,
            sessions: SessionManager::new(),
            require_login: false,
        }
    }

    pub fn with_session_log(mut self, session_log: Arc<dyn SessionLog>) -> Self {
        self.session_log = Some(session_log);
        self
    }

    pub fn with_require_login(mut self, require_login: bool) -> Self {
        self.require_login = require_login;
        self
    }

    /// Trains the model and wires up the configured backends
    pub async fn from_config(config: &Config) -> AppResult<Self> {
        let settings = EngineSettings::from(config);
        let engine = ArchetypeEngine::train(&settings)?;
        let credentials = CredentialStore::new(&config.credentials_path);

        let mut state = Self::new(engine, settings, credentials)
            .with_require_login(config.require_login);
        if let Some(log) = session_log_from_config(config).await? {
            state = state.with_session_log(log);
        }

        Ok(state)
    }
}
