//! User entity type - people who raise, work and approve requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// Display role. Not an authorization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Requester,
    Dispatcher,
    Technician,
    Manager,
    Supplier,
}

impl UserRole {
    /// Roles that can be assigned tickets and work orders
    pub fn can_be_assigned(&self) -> bool {
        matches!(self, UserRole::Technician | UserRole::Manager)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Requester => write!(f, "requester"),
            UserRole::Dispatcher => write!(f, "dispatcher"),
            UserRole::Technician => write!(f, "technician"),
            UserRole::Manager => write!(f, "manager"),
            UserRole::Supplier => write!(f, "supplier"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub role: UserRole,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    const PREFIX: EntityPrefix = EntityPrefix::Usr;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
