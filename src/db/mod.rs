pub mod credentials;
pub mod csv_log;
pub mod postgres;
pub mod remote;
pub mod session_log;

pub use credentials::CredentialStore;
pub use csv_log::CsvSessionLog;
pub use postgres::{create_pool, PostgresSessionLog};
pub use remote::RemoteSessionLog;
pub use session_log::{session_log_from_config, SessionLog};

#[cfg(test)]
pub use session_log::MockSessionLog;
