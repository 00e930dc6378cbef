//! Snapshot schema migrations
//!
//! Each step rewrites a snapshot document from one schema version to the
//! next. Steps run on raw JSON so they can read shapes that the current
//! entity types no longer accept. A document without a `version` field
//! predates versioning and is treated as version 0.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::entities::{AppSettings, CURRENT_VERSION};

/// A migration step failed
#[derive(Debug, Error)]
#[error("migration from version {from} failed: {message}")]
pub struct MigrationError {
    pub from: u32,
    pub message: String,
}

type MigrationStep = fn(Map<String, Value>) -> Result<Map<String, Value>, String>;

/// Steps keyed by the version they migrate *from*, in ascending order
const MIGRATIONS: &[(u32, MigrationStep)] = &[(0, v0_to_v1)];

const COLLECTIONS: &[&str] = &[
    "users",
    "sites",
    "locations",
    "tickets",
    "comments",
    "activities",
    "attachments",
    "assets",
    "workOrders",
    "pmPlans",
    "suppliers",
    "rfqs",
    "quotes",
    "pos",
    "notifications",
];

/// Schema version recorded in a snapshot document
pub fn stored_version(doc: &Value) -> Result<u32, MigrationError> {
    match doc.get("version") {
        None | Some(Value::Null) => Ok(0),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| MigrationError {
                from: 0,
                message: format!("version is not a non-negative integer: {}", v),
            }),
    }
}

/// Run every step needed to bring `doc` up to [`CURRENT_VERSION`]
pub fn migrate(doc: Value) -> Result<Value, MigrationError> {
    let mut version = stored_version(&doc)?;
    let Value::Object(mut map) = doc else {
        return Err(MigrationError {
            from: version,
            message: "snapshot is not a JSON object".to_string(),
        });
    };

    for (from, step) in MIGRATIONS {
        if *from < version {
            continue;
        }
        map = step(map).map_err(|message| MigrationError {
            from: *from,
            message,
        })?;
        version = from + 1;
        tracing::debug!(from = *from, to = version, "applied snapshot migration");
    }

    map.insert("version".to_string(), Value::from(CURRENT_VERSION));
    Ok(Value::Object(map))
}

/// Pre-versioned snapshots could omit empty collections and settings
fn v0_to_v1(mut map: Map<String, Value>) -> Result<Map<String, Value>, String> {
    for key in COLLECTIONS {
        match map.get(*key) {
            None | Some(Value::Null) => {
                map.insert((*key).to_string(), Value::Array(Vec::new()));
            }
            Some(Value::Array(_)) => {}
            Some(other) => return Err(format!("'{}' is not an array: {}", key, other)),
        }
    }

    if !map.contains_key("settings") {
        let settings = serde_json::to_value(AppSettings::default()).map_err(|e| e.to_string())?;
        map.insert("settings".to_string(), settings);
    }

    map.insert("version".to_string(), Value::from(1u32));
    Ok(map)
}
