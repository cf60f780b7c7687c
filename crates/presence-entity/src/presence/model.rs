//! Presence record and write payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use presence_core::AppError;

use super::PresenceStatus;

/// The shared, last-write-wins presence row for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PresenceRecord {
    /// User ID (upsert key).
    pub user_id: String,
    /// Whether the last writer believed the user online.
    pub is_online: bool,
    /// Last confirmed activity.
    pub last_seen: DateTime<Utc>,
    /// Time of the write itself.
    pub updated_at: DateTime<Utc>,
    /// Caller location attached by the primary endpoint only.
    pub location: Option<String>,
}

impl PresenceRecord {
    /// Presence status of this record.
    pub fn status(&self) -> PresenceStatus {
        PresenceStatus::from_online(self.is_online)
    }

    /// Build the row an upsert of `update` produces over `previous`.
    ///
    /// The four core fields are replaced. `location` is replaced only when
    /// the writer supplied one.
    pub fn apply(previous: Option<&Self>, update: &PresenceUpdate, location: Option<String>) -> Self {
        Self {
            user_id: update.user_id.clone(),
            is_online: update.is_online,
            last_seen: update.last_seen,
            updated_at: update.updated_at,
            location: location.or_else(|| previous.and_then(|p| p.location.clone())),
        }
    }
}

/// The four-field payload carried by every presence write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUpdate {
    /// User ID.
    pub user_id: String,
    /// Online flag.
    pub is_online: bool,
    /// Last confirmed activity.
    pub last_seen: DateTime<Utc>,
    /// Time of the write.
    pub updated_at: DateTime<Utc>,
}

impl PresenceUpdate {
    /// Payload stamped with the current wall-clock time.
    pub fn now(user_id: impl Into<String>, is_online: bool) -> Self {
        Self::at(user_id, is_online, Utc::now())
    }

    /// Payload with both timestamps set to `timestamp`.
    pub fn at(user_id: impl Into<String>, is_online: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            is_online,
            last_seen: timestamp,
            updated_at: timestamp,
        }
    }

    /// Presence status carried by this payload.
    pub fn status(&self) -> PresenceStatus {
        PresenceStatus::from_online(self.is_online)
    }

    /// Reject payloads that cannot be keyed.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.user_id.trim().is_empty() {
            return Err(AppError::validation("user_id must not be empty"));
        }
        Ok(())
    }
}
