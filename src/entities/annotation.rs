//! Annotation entity types - comments, activity events and attachments
//!
//! Annotations are polymorphic over their owner: each record carries an
//! [`EntityType`] and the owning entity's id, forming an append-only log per
//! ticket, work order, asset, RFQ or PO.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::entity::{Entity, EntityType};
use crate::core::identity::{EntityId, EntityPrefix};

/// Records that hang off an owning entity
pub trait Annotation {
    fn owner_type(&self) -> EntityType;
    fn owner_id(&self) -> &EntityId;
}

/// Free-text comment left by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub entity_id: EntityId,
    pub user_id: EntityId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        entity_type: EntityType,
        entity_id: EntityId,
        user_id: EntityId,
        content: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Cmt),
            entity_type,
            entity_id,
            user_id,
            content,
            created_at: now,
        }
    }
}

impl Entity for Comment {
    const PREFIX: EntityPrefix = EntityPrefix::Cmt;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Annotation for Comment {
    fn owner_type(&self) -> EntityType {
        self.entity_type
    }

    fn owner_id(&self) -> &EntityId {
        &self.entity_id
    }
}

/// Kind of activity recorded in the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Created,
    Updated,
    StatusChanged,
    Assigned,
    Commented,
    AttachmentAdded,
    AttachmentRemoved,
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityType::Created => write!(f, "created"),
            ActivityType::Updated => write!(f, "updated"),
            ActivityType::StatusChanged => write!(f, "status_changed"),
            ActivityType::Assigned => write!(f, "assigned"),
            ActivityType::Commented => write!(f, "commented"),
            ActivityType::AttachmentAdded => write!(f, "attachment_added"),
            ActivityType::AttachmentRemoved => write!(f, "attachment_removed"),
        }
    }
}

/// Human-readable timeline entry.
///
/// The store never writes these on its own; callers pair each meaningful
/// mutation with an explicit `add_activity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub entity_id: EntityId,
    pub user_id: EntityId,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    pub created_at: DateTime<Utc>,
}

impl ActivityEvent {
    pub fn new(
        entity_type: EntityType,
        entity_id: EntityId,
        user_id: EntityId,
        kind: ActivityType,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Act),
            entity_type,
            entity_id,
            user_id,
            kind,
            description: description.into(),
            metadata: None,
            created_at: now,
        }
    }
}

impl Entity for ActivityEvent {
    const PREFIX: EntityPrefix = EntityPrefix::Act;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Annotation for ActivityEvent {
    fn owner_type(&self) -> EntityType {
        self.entity_type
    }

    fn owner_id(&self) -> &EntityId {
        &self.entity_id
    }
}

/// File attached to an entity; content is stored inline as base64
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub entity_id: EntityId,
    pub name: String,
    /// MIME type
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub data: String,
    pub uploaded_by: EntityId,
    pub created_at: DateTime<Utc>,
}

impl Entity for Attachment {
    const PREFIX: EntityPrefix = EntityPrefix::Att;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Annotation for Attachment {
    fn owner_type(&self) -> EntityType {
        self.entity_type
    }

    fn owner_id(&self) -> &EntityId {
        &self.entity_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_field_name() {
        let event = ActivityEvent::new(
            EntityType::Ticket,
            EntityId::new(EntityPrefix::Tkt),
            EntityId::new(EntityPrefix::Usr),
            ActivityType::StatusChanged,
            "Status changed to resolved",
            Utc::now(),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "status_changed");
        assert_eq!(json["entityType"], "ticket");
        assert!(json.get("metadata").is_none());
    }
}
