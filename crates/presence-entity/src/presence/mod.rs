//! Presence domain entities.

pub mod model;

pub use model::{PresenceRecord, PresenceUpdate};

use serde::{Deserialize, Serialize};

/// Presence state of a session or a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// The user is believed to be interacting with the page.
    Online,
    /// The user is gone, idle past the threshold, or the page is hidden.
    #[default]
    Offline,
}

impl PresenceStatus {
    /// Map the `is_online` flag used on the wire.
    pub fn from_online(is_online: bool) -> Self {
        if is_online { Self::Online } else { Self::Offline }
    }

    /// Check if the status is online.
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = presence_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(presence_core::AppError::validation(format!(
                "Invalid presence status: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_offline() {
        assert_eq!(PresenceStatus::default(), PresenceStatus::Offline);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Online".parse::<PresenceStatus>().unwrap(), PresenceStatus::Online);
        assert!("away".parse::<PresenceStatus>().is_err());
    }
}
