use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user as stored in the credential file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub email: String,
    /// Argon2 PHC string, never the raw password
    pub password_hash: String,
}

/// Authentication status of a request
///
/// Created by a successful login and looked up again from the bearer token on
/// later requests. Handlers that care about who is calling take this as an
/// argument instead of consulting any process-wide flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    pub token: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(username: String, email: String) -> Self {
        Self {
            token: Uuid::new_v4(),
            username,
            email,
            created_at: Utc::now(),
        }
    }
}
