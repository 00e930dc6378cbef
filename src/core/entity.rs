//! Entity trait - common interface for all stored records

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};

/// Common trait for every record held in an entity collection
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// The identifier prefix minted for this entity type
    const PREFIX: EntityPrefix;

    /// Get the entity's unique ID
    fn id(&self) -> &EntityId;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Last modification time, for entities that track one
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Record a modification at `now`. No-op for entities without `updatedAt`.
    fn touch(&mut self, _now: DateTime<Utc>) {}
}

/// A field mask over `T`: set fields overwrite, unset fields are left alone
///
/// Optional target fields are represented as `Option<Option<_>>` so that
/// `Some(None)` clears the value.
pub trait Patch<T> {
    fn apply(self, target: &mut T);
}

/// Overwrite `slot` when the patch field is set
pub(crate) fn set<V>(slot: &mut V, value: Option<V>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Deserialize a patch field for an optional target.
///
/// Missing key stays `None` (via `#[serde(default)]`), an explicit `null`
/// becomes `Some(None)` and clears the target.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Priority values shared by tickets, work orders and SLA policies
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Owning entity kind for comments, activity events and attachments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Ticket,
    #[serde(rename = "workorder")]
    WorkOrder,
    Asset,
    Rfq,
    Po,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Ticket => write!(f, "ticket"),
            EntityType::WorkOrder => write!(f, "workorder"),
            EntityType::Asset => write!(f, "asset"),
            EntityType::Rfq => write!(f, "rfq"),
            EntityType::Po => write!(f, "po"),
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ticket" => Ok(EntityType::Ticket),
            "workorder" | "work_order" | "wo" => Ok(EntityType::WorkOrder),
            "asset" => Ok(EntityType::Asset),
            "rfq" => Ok(EntityType::Rfq),
            "po" => Ok(EntityType::Po),
            _ => Err(format!("Unknown entity type: {}", s)),
        }
    }
}
