//! Cancellable one-shot and periodic timers owned by the session task.
//!
//! A [`Timer`] lives inside the session loop and is awaited from a
//! `tokio::select!` branch. Cancelling it drops the pending deadline, so a
//! cancelled or superseded timer can never fire into the session.

use std::future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{self, Sleep};

/// Timer handle with an explicit `cancel` operation.
#[derive(Debug, Default)]
pub struct Timer {
    sleep: Option<Pin<Box<Sleep>>>,
    /// Re-arm period for periodic timers.
    period: Option<Duration>,
}

impl Timer {
    /// A timer with nothing scheduled.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Fire once after `delay`, replacing anything already scheduled.
    pub fn arm_once(&mut self, delay: Duration) {
        self.sleep = Some(Box::pin(time::sleep(delay)));
        self.period = None;
    }

    /// Fire every `period`, first after one full period.
    pub fn arm_every(&mut self, period: Duration) {
        self.sleep = Some(Box::pin(time::sleep(period)));
        self.period = Some(period);
    }

    /// Drop the pending deadline.
    pub fn cancel(&mut self) {
        self.sleep = None;
        self.period = None;
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.sleep.is_some()
    }

    /// Resolve when the timer fires. Never resolves while idle.
    ///
    /// Cancel-safe: dropping the future before it resolves leaves the
    /// deadline in place.
    pub async fn fired(&mut self) {
        let Some(sleep) = self.sleep.as_mut() else {
            return future::pending().await;
        };
        sleep.as_mut().await;

        match self.period {
            Some(period) => {
                let next = sleep.deadline() + period;
                sleep.as_mut().reset(next);
            }
            None => self.sleep = None,
        }
    }
}
