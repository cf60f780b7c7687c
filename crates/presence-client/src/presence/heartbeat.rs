//! Periodic re-evaluation of presence from elapsed inactivity.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::session::PresenceSession;
use super::state::Transition;
use crate::timer::Timer;

/// Fixed-period heartbeat.
///
/// This is the backstop for pulses the activity aggregator never emitted:
/// every tick re-derives the state from `last_activity_at` alone.
#[derive(Debug)]
pub struct HeartbeatScheduler {
    period: Duration,
    timer: Timer,
}

impl HeartbeatScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            timer: Timer::idle(),
        }
    }

    /// Start ticking; the first tick comes one period from now.
    pub fn start(&mut self) {
        self.timer.arm_every(self.period);
    }

    pub fn stop(&mut self) {
        self.timer.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    /// Resolve on the next tick.
    pub async fn tick(&mut self) {
        self.timer.fired().await
    }
}

/// Decide what a heartbeat tick at `now` means for the session.
pub fn evaluate(session: &PresenceSession, now: Instant) -> Transition {
    let elapsed = session.inactive_for(now);
    let inactive = elapsed > session.inactivity_threshold();

    let transition = match (inactive, session.is_online()) {
        (true, true) => Transition::GoOffline,
        (true, false) => Transition::StayOffline,
        (false, false) => Transition::GoOnline,
        (false, true) => Transition::Refresh,
    };

    debug!(
        user_id = %session.user_id(),
        elapsed_ms = elapsed.as_millis() as u64,
        ?transition,
        "Heartbeat evaluated"
    );

    transition
}
