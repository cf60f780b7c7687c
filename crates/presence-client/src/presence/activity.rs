//! Throttling of raw interaction events into activity pulses.

use std::time::Duration;

use tracing::trace;

use crate::event::InteractionKind;
use crate::timer::Timer;

/// Collapses a stream of interaction events into at most one pulse per
/// quiet window.
///
/// The first event of a window schedules a pulse `quiet` later; events that
/// arrive while a pulse is pending are dropped.
#[derive(Debug)]
pub struct ActivityAggregator {
    quiet: Duration,
    pending: Timer,
    dropped: u64,
}

impl ActivityAggregator {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: Timer::idle(),
            dropped: 0,
        }
    }

    /// Offer an interaction. Returns `true` if it scheduled a pulse.
    pub fn on_interaction(&mut self, kind: InteractionKind) -> bool {
        if self.pending.is_armed() {
            self.dropped += 1;
            return false;
        }
        trace!(event = kind.dom_event(), "Activity pulse scheduled");
        self.pending.arm_once(self.quiet);
        true
    }

    /// Whether a pulse is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_armed()
    }

    /// Events swallowed while a pulse was pending.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Resolve when the scheduled pulse fires. Clears the pending flag.
    pub async fn pulse(&mut self) {
        self.pending.fired().await
    }

    /// Drop any scheduled pulse.
    pub fn cancel(&mut self) {
        self.pending.cancel();
    }
}
