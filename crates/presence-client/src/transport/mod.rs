//! Write paths from a session to the presence backend.

pub mod http;

use async_trait::async_trait;

use presence_core::result::AppResult;
use presence_entity::PresenceUpdate;

pub use http::{HttpBeacon, HttpPresenceGateway};

/// Primary presence-update endpoint.
///
/// `Ok` means the record was durably upserted; any transport error or
/// non-success response is an `Err` and sends the dispatcher to its
/// fallback path.
#[async_trait]
pub trait PresenceGateway: Send + Sync + std::fmt::Debug + 'static {
    async fn update_presence(&self, update: &PresenceUpdate) -> AppResult<()>;
}

/// Fire-and-forget transport used while the page is going away.
///
/// Implementations must not block and must keep delivering after the
/// session that called them is gone. Delivery is attempted at most once
/// and never confirmed.
pub trait BeaconTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Queue `update` for delivery. Returns whether it was queued.
    fn send_beacon(&self, update: &PresenceUpdate) -> bool;
}
