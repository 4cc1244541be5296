use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::{
    error::{AppError, AppResult},
    models::SessionRecord,
};

use super::SessionLog;

/// One row of the local soulprint log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRow {
    pub name: String,
    pub timestamp: String,
    /// JSON array of badge labels
    pub badges: String,
    pub archetype: String,
}

impl From<&SessionRecord> for SessionRow {
    fn from(record: &SessionRecord) -> Self {
        Self {
            name: record.name.clone(),
            timestamp: record.timestamp_iso(),
            badges: record.badges_json(),
            archetype: record.archetype.to_string(),
        }
    }
}

/// Session log backed by a local CSV file with a header row
///
/// Writers inside this process are serialized; nothing guards against other
/// processes appending to the same file.
#[derive(Clone)]
pub struct CsvSessionLog {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvSessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every logged row; a missing file is an empty log
    pub fn read_all(&self) -> AppResult<Vec<SessionRow>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        let rows = reader.deserialize().collect::<Result<Vec<SessionRow>, _>>()?;
        Ok(rows)
    }
}

fn append_row(path: &Path, row: &SessionRow) -> AppResult<()> {
    let needs_header = std::fs::metadata(path)
        .map(|meta| meta.len() == 0)
        .unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    writer.serialize(row)?;
    writer.flush()?;
    Ok(())
}

#[async_trait::async_trait]
impl SessionLog for CsvSessionLog {
    async fn append(&self, record: &SessionRecord) -> AppResult<()> {
        let row = SessionRow::from(record);
        let path = self.path.clone();
        let lock = self.write_lock.clone();

        tokio::task::spawn_blocking(move || {
            let _guard = lock
                .lock()
                .map_err(|_| AppError::Internal("Session log lock poisoned".to_string()))?;
            append_row(&path, &row)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Archetype, Badge, BadgeSet};

    fn record(name: &str, archetype: Archetype) -> SessionRecord {
        let badges: BadgeSet = [Badge::OffThePath, Badge::WonderMystery].into_iter().collect();
        SessionRecord::new(name.to_string(), &badges, archetype)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvSessionLog::new(dir.path().join("soulprint_log.csv"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_each_append_adds_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvSessionLog::new(dir.path().join("soulprint_log.csv"));

        log.append(&record("Ada", Archetype::WildMystic)).await.unwrap();
        let first = log.read_all().unwrap();
        assert_eq!(first.len(), 1);

        log.append(&record("Grace", Archetype::OffbeatNomad)).await.unwrap();
        let second = log.read_all().unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0], first[0]);
        assert_eq!(second[1].name, "Grace");
        assert_eq!(second[1].archetype, "Offbeat Nomad");
        assert_eq!(second[1].badges, r#"["Wonder + Mystery","Off the Path"]"#);
    }

    #[tokio::test]
    async fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soulprint_log.csv");
        let log = CsvSessionLog::new(&path);

        for i in 0..3 {
            log.append(&record(&format!("user{}", i), Archetype::InnerVoyager))
                .await
                .unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("name,timestamp,badges,archetype").count(), 1);
        assert_eq!(contents.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvSessionLog::new(dir.path().join("missing").join("log.csv"));
        assert!(log.append(&record("Ada", Archetype::TimeTraveler)).await.is_err());
    }
}
