use std::sync::Arc;

use crate::{
    config::{Config, SessionLogBackend},
    error::{AppError, AppResult},
    models::SessionRecord,
};

use super::{CsvSessionLog, PostgresSessionLog, RemoteSessionLog};

/// Append-only sink for submitted soulprints
///
/// Implementations add exactly one row per `append` and never touch rows
/// written earlier. There is no update or delete path.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SessionLog: Send + Sync {
    async fn append(&self, record: &SessionRecord) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Builds the session log selected by configuration, if any
pub async fn session_log_from_config(config: &Config) -> AppResult<Option<Arc<dyn SessionLog>>> {
    let log: Arc<dyn SessionLog> = match config.session_log {
        SessionLogBackend::None => return Ok(None),
        SessionLogBackend::Csv => Arc::new(CsvSessionLog::new(&config.session_log_path)),
        SessionLogBackend::Remote => {
            let (Some(url), Some(key)) = (&config.remote_url, &config.remote_key) else {
                return Err(AppError::InvalidInput(
                    "Remote session log needs REMOTE_URL and REMOTE_KEY".to_string(),
                ));
            };
            Arc::new(RemoteSessionLog::new(
                url.clone(),
                key.clone(),
                config.remote_table.clone(),
            ))
        }
        SessionLogBackend::Postgres => {
            let Some(database_url) = &config.database_url else {
                return Err(AppError::InvalidInput(
                    "Postgres session log needs DATABASE_URL".to_string(),
                ));
            };
            Arc::new(PostgresSessionLog::connect(database_url).await?)
        }
    };

    tracing::info!(backend = log.name(), "Session logging enabled");
    Ok(Some(log))
}
