use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Credential, SessionContext};

/// In-memory login sessions keyed by bearer token
///
/// Sessions live until logout or process exit.
#[derive(Clone, Default)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for a verified user
    pub async fn create(&self, credential: &Credential) -> SessionContext {
        let context = SessionContext::new(credential.username.clone(), credential.email.clone());
        self.sessions
            .write()
            .await
            .insert(context.token, context.clone());
        tracing::debug!(username = %context.username, "Session created");
        context
    }

    pub async fn get(&self, token: &Uuid) -> Option<SessionContext> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Ends a session; returns whether it existed
    pub async fn remove(&self, token: &Uuid) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
