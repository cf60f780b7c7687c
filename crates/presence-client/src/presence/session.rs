//! Per-tab presence session state.

use std::time::Duration;

use tokio::time::Instant;

use presence_core::config::TrackerConfig;
use presence_entity::{PresenceStatus, PresenceUpdate};

use crate::event::Visibility;

/// Why a dispatch was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Tracking is disabled or no user id was configured.
    Disabled,
    /// A non-forced write arrived inside the debounce gap.
    Debounced,
}

/// A write that passed the session's gates and is about to go out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Payload sent on both the primary and fallback paths.
    pub update: PresenceUpdate,
    /// Whether the debounce gap was bypassed.
    pub force: bool,
    /// When the dispatch was issued.
    pub issued_at: Instant,
}

/// State owned by one tracking session.
///
/// Nothing here is shared: the session task holds the only copy and every
/// component receives it as explicit `&mut` context.
#[derive(Debug)]
pub struct PresenceSession {
    user_id: String,
    enabled: bool,
    status: PresenceStatus,
    last_activity_at: Instant,
    last_update_sent_at: Option<Instant>,
    visibility: Visibility,
    debounce_gap: Duration,
    inactivity_threshold: Duration,
}

impl PresenceSession {
    /// Fresh session with an empty activity history starting at `now`.
    pub fn new(config: &TrackerConfig, now: Instant) -> Self {
        Self {
            user_id: config.user_id.clone(),
            enabled: config.enabled,
            status: PresenceStatus::Offline,
            last_activity_at: now,
            last_update_sent_at: None,
            visibility: Visibility::Visible,
            debounce_gap: config.debounce_gap(),
            inactivity_threshold: config.inactivity_threshold(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether operations should do anything at all.
    pub fn is_tracking(&self) -> bool {
        self.enabled && !self.user_id.is_empty()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The locally believed presence.
    pub fn status(&self) -> PresenceStatus {
        self.status
    }

    pub fn is_online(&self) -> bool {
        self.status.is_online()
    }

    pub fn last_activity_at(&self) -> Instant {
        self.last_activity_at
    }

    pub fn last_update_sent_at(&self) -> Option<Instant> {
        self.last_update_sent_at
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn inactivity_threshold(&self) -> Duration {
        self.inactivity_threshold
    }

    /// Note user activity at `now`.
    pub fn record_activity(&mut self, now: Instant) {
        self.last_activity_at = now;
    }

    /// Time since the last recognised interaction.
    pub fn inactive_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity_at)
    }

    /// Apply the enabled and debounce gates to a dispatch.
    pub fn begin_dispatch(
        &self,
        is_online: bool,
        force: bool,
        now: Instant,
    ) -> Result<DispatchRequest, SkipReason> {
        if !self.is_tracking() {
            return Err(SkipReason::Disabled);
        }

        if !force {
            if let Some(last) = self.last_update_sent_at {
                if now.saturating_duration_since(last) < self.debounce_gap {
                    return Err(SkipReason::Debounced);
                }
            }
        }

        Ok(DispatchRequest {
            update: PresenceUpdate::now(self.user_id.clone(), is_online),
            force,
            issued_at: now,
        })
    }

    /// Record a delivered write.
    ///
    /// Called in completion order, so the last dispatch to finish decides
    /// the local status. `last_update_sent_at` only moves forward.
    pub fn confirm_dispatch(&mut self, request: &DispatchRequest) {
        self.status = request.update.status();
        self.last_update_sent_at = Some(match self.last_update_sent_at {
            Some(last) => last.max(request.issued_at),
            None => request.issued_at,
        });
    }

    /// Payload for the teardown beacon, if the session is tracking.
    pub fn offline_payload(&self) -> Option<PresenceUpdate> {
        self.is_tracking()
            .then(|| PresenceUpdate::now(self.user_id.clone(), false))
    }
}
