//! Session identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one interactive session.
///
/// A session owns its own context store; two sessions never share state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub started_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
        }
    }

    /// First eight characters of the id, for log lines and `/status`.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self::new()
    }
}
