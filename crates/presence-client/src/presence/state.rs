//! Presence state machine: maps each trigger to a transition.

use tokio::time::Instant;

use super::heartbeat;
use super::session::PresenceSession;
use crate::event::Visibility;

/// Sources that can move a session between `Offline` and `Online`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The session was just created or re-enabled.
    Initialize,
    /// The activity aggregator emitted a pulse.
    ActivityPulse,
    /// The heartbeat scheduler ticked.
    HeartbeatTick,
    /// The page became visible again.
    PageVisible,
    /// The hidden-page grace timer ran out.
    HiddenGraceExpired,
}

/// What the session should do in response to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Forced online write.
    GoOnline,
    /// Non-forced online write, subject to the debounce gap.
    Refresh,
    /// Forced offline write.
    GoOffline,
    /// Inactive and already offline: no write.
    StayOffline,
    /// Nothing to do.
    Ignore,
}

impl Transition {
    /// `(is_online, force)` for transitions that write.
    pub fn dispatch(&self) -> Option<(bool, bool)> {
        match self {
            Self::GoOnline => Some((true, true)),
            Self::Refresh => Some((true, false)),
            Self::GoOffline => Some((false, true)),
            Self::StayOffline | Self::Ignore => None,
        }
    }
}

/// Apply `trigger` to the session and return the resulting transition.
///
/// Activity-bearing triggers update `last_activity_at` here; the caller is
/// responsible for carrying out the dispatch.
pub fn on_trigger(session: &mut PresenceSession, trigger: Trigger, now: Instant) -> Transition {
    if !session.is_tracking() {
        return Transition::Ignore;
    }

    match trigger {
        Trigger::Initialize => Transition::GoOnline,
        Trigger::ActivityPulse => {
            session.record_activity(now);
            if session.is_online() {
                Transition::Ignore
            } else {
                Transition::GoOnline
            }
        }
        Trigger::HeartbeatTick => heartbeat::evaluate(session, now),
        Trigger::PageVisible => {
            session.record_activity(now);
            Transition::GoOnline
        }
        Trigger::HiddenGraceExpired => {
            // live visibility, not the value at the time the timer was armed
            if session.visibility() == Visibility::Hidden {
                Transition::GoOffline
            } else {
                Transition::Ignore
            }
        }
    }
}
