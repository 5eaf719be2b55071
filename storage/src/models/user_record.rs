//! Registered chat user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Internal id, referenced by generation records.
    pub id: String,
    /// Telegram user id.
    pub external_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a new record with a generated UUID and current timestamp.
    pub fn new(external_id: i64, first_name: Option<String>, last_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            external_id,
            first_name,
            last_name,
            created_at: Utc::now(),
        }
    }

    /// First name for greetings; falls back to "there".
    pub fn display_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or("there")
    }
}
