//! # presence-entity
//!
//! Domain models for Presence Hub. `PresenceRecord` is the row of the
//! shared `user_presence` table; `PresenceUpdate` is the four-field payload
//! every write path (primary endpoint, direct upsert, beacon) carries.

pub mod endpoints;
pub mod presence;

pub use presence::{PresenceRecord, PresenceStatus, PresenceUpdate};
