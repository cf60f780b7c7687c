//! reqwest-backed gateway and beacon.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use presence_core::config::TrackerConfig;
use presence_core::error::{AppError, ErrorKind};
use presence_core::result::AppResult;
use presence_entity::PresenceUpdate;
use presence_entity::endpoints;

use super::{BeaconTransport, PresenceGateway};

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Calls the primary `update-with-location` endpoint.
#[derive(Debug, Clone)]
pub struct HttpPresenceGateway {
    client: Client,
    url: String,
}

impl HttpPresenceGateway {
    pub fn new(config: &TrackerConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            url: join_url(&config.base_url, endpoints::UPDATE_WITH_LOCATION),
        })
    }
}

#[async_trait]
impl PresenceGateway for HttpPresenceGateway {
    async fn update_presence(&self, update: &PresenceUpdate) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(update)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Presence update request failed: {e}"),
                    e,
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Presence update rejected with status {status}"
            )));
        }
        Ok(())
    }
}

/// Posts the offline payload from a detached task.
///
/// The body goes out as `text/plain`, the way browser beacons send it, so
/// the sink never depends on a preflight or a content-type negotiation.
#[derive(Debug, Clone)]
pub struct HttpBeacon {
    client: Client,
    url: String,
}

impl HttpBeacon {
    pub fn new(config: &TrackerConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            url: join_url(&config.base_url, endpoints::OFFLINE_BEACON),
        })
    }
}

impl BeaconTransport for HttpBeacon {
    fn send_beacon(&self, update: &PresenceUpdate) -> bool {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return false;
        };
        let Ok(body) = serde_json::to_string(update) else {
            return false;
        };

        let request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain;charset=UTF-8")
            .body(body);
        let user_id = update.user_id.clone();

        runtime.spawn(async move {
            // no retry, no confirmation
            if let Err(e) = request.send().await {
                debug!(user_id = %user_id, error = %e, "Offline beacon not delivered");
            }
        });
        true
    }
}
