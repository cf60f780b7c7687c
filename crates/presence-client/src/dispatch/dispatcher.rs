//! Update dispatcher: primary endpoint first, direct store upsert second.

use std::sync::Arc;

use tracing::{error, info, warn};

use presence_database::PresenceStore;

use crate::presence::session::{DispatchRequest, SkipReason};
use crate::transport::PresenceGateway;

/// Which route delivered a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPath {
    /// The presence-update endpoint.
    Primary,
    /// Direct upsert into the presence store, without enrichment.
    Fallback,
}

/// Result of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No network call was made.
    Skipped(SkipReason),
    /// The write landed through the given path.
    Delivered(DeliveryPath),
    /// Both paths failed; local state is unchanged.
    Failed,
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// Sends presence writes for one session.
///
/// Cheap to clone: each in-flight dispatch owns a clone so the session loop
/// never waits on the network.
#[derive(Debug, Clone)]
pub struct UpdateDispatcher {
    gateway: Arc<dyn PresenceGateway>,
    fallback: Arc<dyn PresenceStore>,
}

impl UpdateDispatcher {
    pub fn new(gateway: Arc<dyn PresenceGateway>, fallback: Arc<dyn PresenceStore>) -> Self {
        Self { gateway, fallback }
    }

    /// Deliver `request`, falling back to the store when the primary path fails.
    ///
    /// The fallback carries exactly the same four fields as the primary
    /// request.
    pub async fn deliver(&self, request: &DispatchRequest) -> DispatchOutcome {
        let update = &request.update;

        let primary_err = match self.gateway.update_presence(update).await {
            Ok(()) => {
                info!(
                    user_id = %update.user_id,
                    status = %update.status(),
                    force = request.force,
                    "Presence updated"
                );
                return DispatchOutcome::Delivered(DeliveryPath::Primary);
            }
            Err(e) => e,
        };

        warn!(
            user_id = %update.user_id,
            error = %primary_err,
            "Primary presence update failed, falling back to direct upsert"
        );

        match self.fallback.upsert(update).await {
            Ok(()) => {
                info!(
                    user_id = %update.user_id,
                    status = %update.status(),
                    "Presence updated through fallback"
                );
                DispatchOutcome::Delivered(DeliveryPath::Fallback)
            }
            Err(e) => {
                error!(
                    user_id = %update.user_id,
                    error = %e,
                    "Fallback presence update failed"
                );
                DispatchOutcome::Failed
            }
        }
    }
}
