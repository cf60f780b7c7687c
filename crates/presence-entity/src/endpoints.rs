//! HTTP paths shared by the presence client and the presence API.

/// Primary write path; the server enriches the row with caller location.
pub const UPDATE_WITH_LOCATION: &str = "/api/presence/update-with-location";

/// Fire-and-forget offline beacon sink.
pub const OFFLINE_BEACON: &str = "/api/presence/offline";
