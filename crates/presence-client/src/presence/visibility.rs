//! Hidden-page grace period and page teardown.

use std::time::Duration;

use tracing::{debug, info};

use presence_entity::PresenceUpdate;

use super::session::PresenceSession;
use crate::event::Visibility;
use crate::timer::Timer;

/// Tracks page visibility and arms the hidden-grace timer.
#[derive(Debug)]
pub struct VisibilityMonitor {
    grace: Duration,
    timer: Timer,
}

impl VisibilityMonitor {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            timer: Timer::idle(),
        }
    }

    /// Record a visibility change on the session.
    ///
    /// Hiding arms the grace timer unless one is already running for the
    /// current hidden stretch. Becoming visible cancels it. Returns `true`
    /// only when a hidden page became visible again and the caller should
    /// force the session online.
    pub fn on_change(&mut self, session: &mut PresenceSession, visibility: Visibility) -> bool {
        let previous = session.visibility();
        session.set_visibility(visibility);

        match visibility {
            Visibility::Hidden => {
                if previous != Visibility::Hidden || !self.timer.is_armed() {
                    debug!(
                        user_id = %session.user_id(),
                        grace_ms = self.grace.as_millis() as u64,
                        "Page hidden, offline after grace period"
                    );
                    self.timer.arm_once(self.grace);
                }
                false
            }
            Visibility::Visible => {
                self.timer.cancel();
                if previous != Visibility::Hidden {
                    return false;
                }
                debug!(user_id = %session.user_id(), "Page visible again");
                true
            }
        }
    }

    /// Whether the grace timer is running.
    pub fn is_grace_pending(&self) -> bool {
        self.timer.is_armed()
    }

    /// Resolve when the grace period runs out.
    pub async fn grace_expired(&mut self) {
        self.timer.fired().await
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }
}

/// Offline payload to hand to the beacon when the page goes away.
pub fn teardown_payload(session: &PresenceSession) -> Option<PresenceUpdate> {
    let payload = session.offline_payload()?;
    info!(user_id = %session.user_id(), "Page unloading, sending offline beacon");
    Some(payload)
}
