/// Remote table session log
///
/// Inserts rows through a PostgREST-style endpoint (the REST interface a
/// Supabase project exposes): `POST {url}/rest/v1/{table}`, authenticated
/// with the project API key both as `apikey` and as a bearer token.
use reqwest::Client as HttpClient;
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::SessionRecord,
};

use super::SessionLog;

/// Row shape expected by the remote table
#[derive(Debug, Serialize, PartialEq)]
pub struct RemoteRow {
    pub user_name: String,
    pub timestamp: String,
    /// JSON-encoded array of badge labels
    pub selected_badges: String,
    pub assigned_archetype: String,
}

impl From<&SessionRecord> for RemoteRow {
    fn from(record: &SessionRecord) -> Self {
        Self {
            user_name: record.name.clone(),
            timestamp: record.timestamp_iso(),
            selected_badges: record.badges_json(),
            assigned_archetype: record.archetype.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct RemoteSessionLog {
    http_client: HttpClient,
    api_url: String,
    api_key: String,
    table: String,
}

impl RemoteSessionLog {
    pub fn new(api_url: String, api_key: String, table: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            api_key,
            table,
        }
    }

    fn insert_url(&self) -> String {
        format!("{}/rest/v1/{}", self.api_url.trim_end_matches('/'), self.table)
    }
}

#[async_trait::async_trait]
impl SessionLog for RemoteSessionLog {
    async fn append(&self, record: &SessionRecord) -> AppResult<()> {
        let url = self.insert_url();

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&RemoteRow::from(record))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                table = %self.table,
                "Remote insert failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Remote table returned status {}: {}",
                status, body
            )));
        }

        tracing::debug!(table = %self.table, "Remote insert succeeded");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Archetype, Badge, BadgeSet};

    fn record() -> SessionRecord {
        let badges: BadgeSet = [Badge::SoloTraveler, Badge::BudgetFriendly].into_iter().collect();
        SessionRecord::new("Ada".to_string(), &badges, Archetype::IndependentExplorer)
    }

    #[test]
    fn test_row_field_names() {
        let row = RemoteRow::from(&record());
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["user_name"], "Ada");
        assert_eq!(json["assigned_archetype"], "Independent Explorer");
        assert_eq!(
            json["selected_badges"],
            r#"["Solo Traveler","Budget-Friendly"]"#
        );
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_insert_url_trims_trailing_slash() {
        let log = RemoteSessionLog::new(
            "https://demo.supabase.co/".to_string(),
            "key".to_string(),
            "soulprints".to_string(),
        );
        assert_eq!(log.insert_url(), "https://demo.supabase.co/rest/v1/soulprints");
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_an_error() {
        let log = RemoteSessionLog::new(
            "http://127.0.0.1:9".to_string(),
            "key".to_string(),
            "soulprints".to_string(),
        );
        assert!(log.append(&record()).await.is_err());
    }
}
