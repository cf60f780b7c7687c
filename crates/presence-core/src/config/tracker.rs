//! Client-side presence tracker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a single presence-tracking session.
///
/// Only `user_id` is required by the embedding page. The timing fields
/// default to the values the tracker was tuned with and are exposed so
/// tests and operators can shorten them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Identifier of the tracked user. An empty id disables every operation.
    #[serde(default)]
    pub user_id: String,
    /// Whether tracking is active.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Heartbeat period in milliseconds.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_ms: u64,
    /// Base URL of the presence backend (primary and beacon endpoints).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Quiet delay after the first interaction before an activity pulse fires.
    #[serde(default = "default_activity_quiet")]
    pub activity_quiet_ms: u64,
    /// Minimum gap between two non-forced presence writes.
    #[serde(default = "default_debounce_gap")]
    pub debounce_gap_ms: u64,
    /// Inactivity after which a visible session is considered offline.
    #[serde(default = "default_inactivity_threshold")]
    pub inactivity_threshold_ms: u64,
    /// How long a page may stay hidden before the session goes offline.
    #[serde(default = "default_hidden_grace")]
    pub hidden_grace_ms: u64,
    /// Timeout applied to each primary-path HTTP request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl TrackerConfig {
    /// Config for `user_id` with every other field at its default.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Heartbeat period.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    /// Activity quiet delay.
    pub fn activity_quiet(&self) -> Duration {
        Duration::from_millis(self.activity_quiet_ms)
    }

    /// Debounce gap between non-forced writes.
    pub fn debounce_gap(&self) -> Duration {
        Duration::from_millis(self.debounce_gap_ms)
    }

    /// Inactivity threshold.
    pub fn inactivity_threshold(&self) -> Duration {
        Duration::from_millis(self.inactivity_threshold_ms)
    }

    /// Hidden-page grace period.
    pub fn hidden_grace(&self) -> Duration {
        Duration::from_millis(self.hidden_grace_ms)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            enabled: true,
            heartbeat_interval_ms: default_heartbeat_interval(),
            base_url: default_base_url(),
            activity_quiet_ms: default_activity_quiet(),
            debounce_gap_ms: default_debounce_gap(),
            inactivity_threshold_ms: default_inactivity_threshold(),
            hidden_grace_ms: default_hidden_grace(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_heartbeat_interval() -> u64 {
    30_000
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_activity_quiet() -> u64 {
    3_000
}

fn default_debounce_gap() -> u64 {
    10_000
}

fn default_inactivity_threshold() -> u64 {
    120_000
}

fn default_hidden_grace() -> u64 {
    60_000
}

fn default_request_timeout() -> u64 {
    10_000
}
