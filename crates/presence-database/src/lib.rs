//! # presence-database
//!
//! Storage for the shared presence table: the [`PresenceStore`] trait, the
//! PostgreSQL repository behind it, an in-memory implementation, and the
//! manager that picks one from configuration.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryPresenceStore;
pub use provider::PresenceStoreManager;
pub use repositories::presence::PresenceRepository;
pub use store::PresenceStore;
