use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Archetype, Badge, BadgeSet};

/// A (synthetic) traveler: the badges they picked and the archetype they carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub badges: BadgeSet,
    pub archetype: Archetype,
}

/// One submitted soulprint, as written to the session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub badges: Vec<Badge>,
    pub archetype: Archetype,
}

impl SessionRecord {
    /// Creates a record stamped with the current time
    pub fn new(name: String, badges: &BadgeSet, archetype: Archetype) -> Self {
        Self {
            name,
            timestamp: Utc::now(),
            badges: badges.to_vec(),
            archetype,
        }
    }

    /// Badge labels encoded as a JSON array string
    pub fn badges_json(&self) -> String {
        let labels: Vec<&str> = self.badges.iter().map(Badge::as_str).collect();
        serde_json::Value::from(labels).to_string()
    }

    /// ISO-8601 timestamp
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badges_json_encoding() {
        let badges: BadgeSet = [Badge::SlowSoulful, Badge::FoodSoul].into_iter().collect();
        let record = SessionRecord::new("Ada".to_string(), &badges, Archetype::SensoryWanderer);
        assert_eq!(record.badges_json(), r#"["Food + Soul","Slow & Soulful"]"#);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let record = SessionRecord::new(
            "Ada".to_string(),
            &BadgeSet::new(),
            Archetype::MindfulSeeker,
        );
        let parsed = DateTime::parse_from_rfc3339(&record.timestamp_iso()).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), record.timestamp);
    }
}
