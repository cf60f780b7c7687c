//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use presence_entity::PresenceUpdate;

/// Body of both presence write endpoints.
///
/// Timestamps default to the time of receipt when a writer omits them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PresenceUpdateRequest {
    /// User ID.
    #[validate(length(min = 1, max = 255, message = "user_id is required"))]
    pub user_id: String,
    /// Online flag.
    pub is_online: bool,
    /// Last confirmed activity.
    #[serde(default = "Utc::now")]
    pub last_seen: DateTime<Utc>,
    /// Time of the write.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl PresenceUpdateRequest {
    pub fn into_update(self) -> PresenceUpdate {
        PresenceUpdate {
            user_id: self.user_id,
            is_online: self.is_online,
            last_seen: self.last_seen,
            updated_at: self.updated_at,
        }
    }
}

/// Query parameters for `GET /api/presence`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPresenceQuery {
    /// Only return users currently marked online.
    #[serde(default)]
    pub online: bool,
}
