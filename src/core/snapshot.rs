//! Persistence gateway: the whole aggregate as one versioned snapshot
//!
//! Every snapshot lives under a single storage key. Reads that fail for any
//! reason fall back to fresh demo data; writes that fail are logged and the
//! in-memory state stays authoritative. Only import reports malformed input
//! back to the caller.

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use crate::core::migrate::{self, MigrationError};
use crate::core::seed::{DemoSeed, SeedProducer};
use crate::core::storage::{Storage, StorageError};
use crate::entities::{AppData, CURRENT_VERSION};

/// Default storage key for the snapshot
pub const STORAGE_KEY: &str = "operations-hub-data";

/// Errors raised while reading, writing or importing snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot data: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error("snapshot version {found} is newer than this build supports ({supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// File name offered for an export taken on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("operations-hub-data-{}.json", date.format("%Y-%m-%d"))
}

/// Loads and saves [`AppData`] snapshots against a [`Storage`] backend
#[derive(Debug)]
pub struct Persistence<S, P = DemoSeed> {
    storage: S,
    seed: P,
    key: String,
}

impl<S: Storage> Persistence<S, DemoSeed> {
    /// Gateway seeded with demo data under the default key
    pub fn new(storage: S) -> Self {
        Self::with_seed(storage, DemoSeed)
    }
}

impl<S: Storage, P: SeedProducer> Persistence<S, P> {
    pub fn with_seed(storage: S, seed: P) -> Self {
        Self {
            storage,
            seed,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Use a different storage key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the current aggregate.
    ///
    /// - Nothing stored: generate the seed, persist it, return it.
    /// - Stored at an older version: migrate, persist, return.
    /// - Unreadable, unparsable or from a newer build: log and return a fresh
    ///   seed without persisting it.
    pub fn load(&self) -> AppData {
        match self.read() {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(key = %self.key, "no snapshot found, seeding demo data");
                let data = self.seed.generate();
                self.save(&data);
                data
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "failed to load data, falling back to demo data");
                self.seed.generate()
            }
        }
    }

    /// Read and decode the stored snapshot, migrating it if needed
    fn read(&self) -> Result<Option<AppData>, SnapshotError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };

        let doc: Value = serde_json::from_str(&raw).map_err(SnapshotError::MalformedInput)?;
        let version = migrate::stored_version(&doc)?;

        if version > CURRENT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: version,
                supported: CURRENT_VERSION,
            });
        }

        if version < CURRENT_VERSION {
            tracing::warn!(from = version, to = CURRENT_VERSION, "migrating stored snapshot");
            let migrated = migrate::migrate(doc)?;
            let data: AppData =
                serde_json::from_value(migrated).map_err(SnapshotError::MalformedInput)?;
            self.save(&data);
            return Ok(Some(data));
        }

        let data = serde_json::from_value(doc).map_err(SnapshotError::MalformedInput)?;
        Ok(Some(data))
    }

    /// Write the full aggregate. Failures are logged, never returned.
    pub fn save(&self, data: &AppData) {
        if let Err(e) = self.try_save(data) {
            tracing::error!(key = %self.key, error = %e, "failed to save data");
        }
    }

    /// Write the full aggregate, reporting failure to the caller
    pub fn try_save(&self, data: &AppData) -> Result<(), SnapshotError> {
        let json = serde_json::to_string(data).map_err(SnapshotError::Serialize)?;
        self.storage.set(&self.key, &json)?;
        tracing::debug!(key = %self.key, bytes = json.len(), "snapshot saved");
        Ok(())
    }

    /// Pretty-printed copy of the persisted aggregate, for download
    pub fn export_snapshot(&self) -> Result<String, SnapshotError> {
        let data = self.load();
        serde_json::to_string_pretty(&data).map_err(SnapshotError::Serialize)
    }

    /// Replace the stored snapshot with `serialized`.
    ///
    /// The version is stamped as current without running migrations. Parse
    /// failures come back as [`SnapshotError::MalformedInput`] and leave the
    /// stored snapshot untouched.
    pub fn import_snapshot(&self, serialized: &str) -> Result<AppData, SnapshotError> {
        let mut data: AppData = serde_json::from_str(serialized).map_err(|e| {
            tracing::warn!(error = %e, "rejected import");
            SnapshotError::MalformedInput(e)
        })?;
        data.version = CURRENT_VERSION;
        self.try_save(&data)?;
        Ok(data)
    }

    /// Discard the stored snapshot and start over from the seed
    pub fn reset_to_seed(&self) -> AppData {
        let data = self.seed.generate();
        self.save(&data);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed::EmptySeed;
    use crate::core::storage::MemoryStorage;
    use serde_json::json;

    fn gateway() -> Persistence<MemoryStorage> {
        Persistence::new(MemoryStorage::new())
    }

    #[test]
    fn test_load_seeds_when_empty() {
        let p = gateway();
        let first = p.load();
        assert_eq!(first.version, CURRENT_VERSION);
        assert!(!first.users.is_empty());
        assert!(!first.sites.is_empty());
        assert!(p.storage().raw(STORAGE_KEY).is_some());

        let second = p.load();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_corrupt_falls_back_without_persisting() {
        let p = gateway();
        p.storage().set(STORAGE_KEY, "{not json").unwrap();
        let data = p.load();
        assert!(!data.users.is_empty());
        assert_eq!(p.storage().raw(STORAGE_KEY).as_deref(), Some("{not json"));
    }

    #[test]
    fn test_load_wrong_shape_falls_back() {
        let p = gateway();
        p.storage()
            .set(STORAGE_KEY, &json!({"version": 1, "users": "nope"}).to_string())
            .unwrap();
        let data = p.load();
        assert!(!data.users.is_empty());
    }

    #[test]
    fn test_load_newer_version_falls_back() {
        let p = Persistence::with_seed(MemoryStorage::new(), EmptySeed);
        let mut stored = crate::core::seed::demo_data(chrono::Utc::now());
        stored.version = CURRENT_VERSION + 1;
        let raw = serde_json::to_string(&stored).unwrap();
        p.storage().set(STORAGE_KEY, &raw).unwrap();

        let data = p.load();
        assert!(data.users.is_empty());
        assert_eq!(p.storage().raw(STORAGE_KEY), Some(raw));
    }

    #[test]
    fn test_load_migrates_and_persists_old_snapshot() {
        let p = gateway();
        p.storage()
            .set(STORAGE_KEY, &json!({"users": [], "sites": []}).to_string())
            .unwrap();

        let data = p.load();
        assert_eq!(data.version, CURRENT_VERSION);
        assert!(data.tickets.is_empty());

        let raw: Value = serde_json::from_str(&p.storage().raw(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(raw["version"], CURRENT_VERSION);
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let p = gateway();
        let data = p.load();
        p.storage().fail_writes(true);
        p.save(&data);
        assert!(p.try_save(&data).is_err());
    }

    #[test]
    fn test_import_malformed_is_error() {
        let p = gateway();
        let before = p.load();
        let err = p.import_snapshot("this is not json").unwrap_err();
        assert!(matches!(err, SnapshotError::MalformedInput(_)));
        assert_eq!(p.load(), before);
    }

    #[test]
    fn test_import_stamps_version_without_migrating() {
        let p = gateway();
        let mut doc = serde_json::to_value(AppData::empty()).unwrap();
        doc["version"] = json!(0);
        let imported = p.import_snapshot(&doc.to_string()).unwrap();
        assert_eq!(imported.version, CURRENT_VERSION);
        assert_eq!(p.load(), imported);
    }

    #[test]
    fn test_import_keeps_foreign_ids() {
        let p = gateway();
        let uuid = "3f2b9c1e-8d4a-4b7e-9a51-2c6f0d7e8a90";
        let mut doc = serde_json::to_value(AppData::empty()).unwrap();
        doc["users"] = json!([{
            "id": uuid,
            "name": "Imported User",
            "email": "imported@example.com",
            "role": "manager",
            "createdAt": "2024-01-15T09:00:00Z"
        }]);
        doc["currentUserId"] = json!(uuid);

        let imported = p.import_snapshot(&doc.to_string()).unwrap();
        assert_eq!(imported.users[0].id.as_str(), uuid);

        // Loading must return the stored user, not fall back to the demo data
        let loaded = p.load();
        assert_eq!(loaded, imported);
        assert_eq!(loaded.users.len(), 1);
        assert_eq!(loaded.users[0].name, "Imported User");
        assert_eq!(loaded.current_user_id.as_ref().map(|id| id.as_str()), Some(uuid));

        let raw: Value = serde_json::from_str(&p.storage().raw(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(raw["users"][0]["id"], uuid);
    }

    #[test]
    fn test_export_import_round_trip() {
        let source = gateway();
        let original = source.load();
        let exported = source.export_snapshot().unwrap();
        assert!(exported.contains("\n  \"version\""));

        let target = Persistence::with_seed(MemoryStorage::new(), EmptySeed);
        let imported = target.import_snapshot(&exported).unwrap();
        assert_eq!(imported, original);
    }

    #[test]
    fn test_reset_replaces_snapshot() {
        let p = gateway();
        let first = p.load();
        let reset = p.reset_to_seed();
        assert_ne!(first.users[0].id, reset.users[0].id);
        assert_eq!(p.load(), reset);
    }

    #[test]
    fn test_custom_key() {
        let p = gateway().with_key("other");
        p.load();
        assert!(p.storage().raw("other").is_some());
        assert!(p.storage().raw(STORAGE_KEY).is_none());
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "operations-hub-data-2024-03-09.json");
    }
}
