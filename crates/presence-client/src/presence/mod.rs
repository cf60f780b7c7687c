//! Presence session components.
//!
//! [`session::PresenceSession`] holds the state; the other modules are the
//! components that read and advance it: the activity aggregator, the
//! heartbeat scheduler, the visibility monitor, and the state machine that
//! turns their triggers into transitions.

pub mod activity;
pub mod heartbeat;
pub mod session;
pub mod state;
pub mod visibility;

pub use activity::ActivityAggregator;
pub use heartbeat::HeartbeatScheduler;
pub use session::{DispatchRequest, PresenceSession, SkipReason};
pub use state::{Transition, Trigger};
pub use visibility::VisibilityMonitor;
