use serde::Deserialize;
use std::path::PathBuf;

use crate::services::classifier::ClassifierKind;

/// Where submitted soulprints are recorded, if anywhere
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionLogBackend {
    #[default]
    None,
    Csv,
    Remote,
    Postgres,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Which classifier to fit on the synthetic users
    #[serde(default)]
    pub classifier: ClassifierKind,

    /// Number of synthetic users generated per training run
    #[serde(default = "default_synthetic_users")]
    pub synthetic_users: usize,

    /// Fixed RNG seed for data generation; unset means a fresh sample every run
    #[serde(default)]
    pub synthetic_seed: Option<u64>,

    #[serde(default)]
    pub session_log: SessionLogBackend,

    /// Local CSV file used by the `csv` session log backend
    #[serde(default = "default_session_log_path")]
    pub session_log_path: PathBuf,

    /// Local CSV file holding registered users
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    /// Reject archetype requests that carry no login session
    #[serde(default)]
    pub require_login: bool,

    /// Base URL of the remote table service (e.g. a Supabase project URL)
    #[serde(default)]
    pub remote_url: Option<String>,

    /// API key for the remote table service
    #[serde(default)]
    pub remote_key: Option<String>,

    #[serde(default = "default_remote_table")]
    pub remote_table: String,

    /// PostgreSQL connection URL for the `postgres` session log backend
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_synthetic_users() -> usize {
    200
}

fn default_session_log_path() -> PathBuf {
    PathBuf::from("soulprint_log.csv")
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("users.csv")
}

fn default_remote_table() -> String {
    "soulprints".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            classifier: ClassifierKind::default(),
            synthetic_users: default_synthetic_users(),
            synthetic_seed: None,
            session_log: SessionLogBackend::None,
            session_log_path: default_session_log_path(),
            credentials_path: default_credentials_path(),
            require_login: false,
            remote_url: None,
            remote_key: None,
            remote_table: default_remote_table(),
            database_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the selected session log backend has what it needs
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.synthetic_users < 10 {
            anyhow::bail!(
                "SYNTHETIC_USERS must be at least 10, got {}",
                self.synthetic_users
            );
        }

        match self.session_log {
            SessionLogBackend::Remote if self.remote_url.is_none() || self.remote_key.is_none() => {
                anyhow::bail!("SESSION_LOG=remote requires REMOTE_URL and REMOTE_KEY")
            }
            SessionLogBackend::Postgres if self.database_url.is_none() => {
                anyhow::bail!("SESSION_LOG=postgres requires DATABASE_URL")
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.synthetic_users, 200);
        assert_eq!(config.session_log, SessionLogBackend::None);
    }

    #[test]
    fn test_remote_backend_requires_credentials() {
        let config = Config {
            session_log: SessionLogBackend::Remote,
            remote_url: Some("https://example.supabase.co".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            remote_key: Some("anon-key".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_postgres_backend_requires_database_url() {
        let config = Config {
            session_log: SessionLogBackend::Postgres,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_too_few_synthetic_users_rejected() {
        let config = Config {
            synthetic_users: 3,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_names_deserialize_lowercase() {
        let backend: SessionLogBackend = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(backend, SessionLogBackend::Postgres);
    }
}
