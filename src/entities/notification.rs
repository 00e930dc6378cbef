//! Notification entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Assignment,
    SlaWarning,
    SlaOverdue,
    ApprovalRequest,
    QuoteReceived,
    PmDue,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Assignment => write!(f, "assignment"),
            NotificationType::SlaWarning => write!(f, "sla_warning"),
            NotificationType::SlaOverdue => write!(f, "sla_overdue"),
            NotificationType::ApprovalRequest => write!(f, "approval_request"),
            NotificationType::QuoteReceived => write!(f, "quote_received"),
            NotificationType::PmDue => write!(f, "pm_due"),
        }
    }
}

/// A message addressed to one user.
///
/// `read` only ever moves from false to true; the store exposes no way to
/// un-read a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EntityId,
    pub user_id: EntityId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,

    /// Free-form owning entity kind (e.g. "ticket", "po")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,

    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub(crate) fn mark_read(&mut self) {
        self.read = true;
    }
}

impl Entity for Notification {
    const PREFIX: EntityPrefix = EntityPrefix::Ntf;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
