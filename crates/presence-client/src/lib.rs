//! # presence-client
//!
//! Client-side presence tracking for Presence Hub. Provides:
//!
//! - Throttling of raw page interactions into activity pulses
//! - A heartbeat that derives Online/Offline from elapsed inactivity
//! - A grace period before hidden pages are marked offline
//! - Debounced presence writes with a direct-store fallback
//! - A best-effort offline beacon on page teardown

pub mod dispatch;
pub mod event;
pub mod presence;
pub mod timer;
pub mod tracker;
pub mod transport;

#[cfg(test)]
mod testing;

pub use dispatch::{DeliveryPath, DispatchOutcome, UpdateDispatcher};
pub use event::{InteractionKind, PageEvent, Visibility};
pub use presence::SkipReason;
pub use tracker::{PresenceHandle, PresenceTracker};
pub use transport::{BeaconTransport, HttpBeacon, HttpPresenceGateway, PresenceGateway};
