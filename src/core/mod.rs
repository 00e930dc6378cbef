//! Core module - identity, persistence and the live store

pub mod config;
pub mod dashboard;
pub mod entity;
pub mod identity;
pub mod lookup;
pub mod migrate;
pub mod seed;
pub mod sla;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use config::Config;
pub use dashboard::DashboardStats;
pub use entity::{Entity, EntityType, Patch, Priority};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use migrate::MigrationError;
pub use seed::{DemoSeed, EmptySeed, SeedProducer};
pub use sla::{sla_deadline_for, sla_status, SlaStatus};
pub use snapshot::{Persistence, SnapshotError, STORAGE_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::Store;
