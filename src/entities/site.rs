//! Site and Location entity types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// A facility operated by the organisation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: EntityId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub industry: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<EntityId>,

    pub created_at: DateTime<Utc>,
}

impl Entity for Site {
    const PREFIX: EntityPrefix = EntityPrefix::Site;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A named place inside a site (room, floor area, yard)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: EntityId,
    pub site_id: EntityId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Entity for Location {
    const PREFIX: EntityPrefix = EntityPrefix::Loc;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
