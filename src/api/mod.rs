pub mod auth;
pub mod handlers;
pub mod page;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;

use crate::error::{AppError, AppResult};

/// Runs file I/O or CPU-heavy work off the async executor
pub(crate) async fn run_blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}
