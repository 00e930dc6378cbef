//! Ticket entity type - service desk requests

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{double_option, set, Entity, Patch, Priority};
use crate::core::identity::{EntityId, EntityPrefix};

/// Ticket workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    OnHold,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Resolved and closed tickets no longer run against their SLA
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::InProgress => write!(f, "in_progress"),
            TicketStatus::OnHold => write!(f, "on_hold"),
            TicketStatus::Resolved => write!(f, "resolved"),
            TicketStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "on_hold" => Ok(TicketStatus::OnHold),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(format!(
                "Invalid ticket status: {}. Use open, in_progress, on_hold, resolved, or closed",
                s
            )),
        }
    }
}

/// Ticket category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    #[default]
    Maintenance,
    It,
    Facilities,
    Safety,
    Other,
}

impl std::fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketCategory::Maintenance => write!(f, "maintenance"),
            TicketCategory::It => write!(f, "it"),
            TicketCategory::Facilities => write!(f, "facilities"),
            TicketCategory::Safety => write!(f, "safety"),
            TicketCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for TicketCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maintenance" => Ok(TicketCategory::Maintenance),
            "it" => Ok(TicketCategory::It),
            "facilities" => Ok(TicketCategory::Facilities),
            "safety" => Ok(TicketCategory::Safety),
            "other" => Ok(TicketCategory::Other),
            _ => Err(format!(
                "Invalid ticket category: {}. Use maintenance, it, facilities, safety, or other",
                s
            )),
        }
    }
}

/// A service desk ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: Priority,
    pub status: TicketStatus,
    pub site_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<EntityId>,

    pub requester_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Resolution deadline derived from the SLA policy at creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_deadline: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Create a new open ticket raised by `requester_id` at `now`
    pub fn new(
        title: String,
        description: String,
        site_id: EntityId,
        requester_id: EntityId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Tkt),
            title,
            description,
            category: TicketCategory::default(),
            priority: Priority::default(),
            status: TicketStatus::Open,
            site_id,
            location_id: None,
            requester_id,
            assignee_id: None,
            due_date: None,
            sla_deadline: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            closed_at: None,
        }
    }
}

impl Entity for Ticket {
    const PREFIX: EntityPrefix = EntityPrefix::Tkt;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        Some(self.updated_at)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Partial update for a [`Ticket`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TicketPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<TicketCategory>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub site_id: Option<EntityId>,
    #[serde(default, deserialize_with = "double_option")]
    pub location_id: Option<Option<EntityId>>,
    #[serde(default)]
    pub requester_id: Option<EntityId>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<EntityId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub sla_deadline: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub resolved_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub closed_at: Option<Option<DateTime<Utc>>>,
}

impl TicketPatch {
    /// Status change, stamping `resolvedAt`/`closedAt` when entering those states
    pub fn status_change(status: TicketStatus, now: DateTime<Utc>) -> Self {
        let mut patch = Self {
            status: Some(status),
            ..Default::default()
        };
        match status {
            TicketStatus::Resolved => patch.resolved_at = Some(Some(now)),
            TicketStatus::Closed => patch.closed_at = Some(Some(now)),
            _ => {}
        }
        patch
    }

    /// Assign to a user, or clear the assignee with `None`
    pub fn assign(assignee_id: Option<EntityId>) -> Self {
        Self {
            assignee_id: Some(assignee_id),
            ..Default::default()
        }
    }
}

impl Patch<Ticket> for TicketPatch {
    fn apply(self, t: &mut Ticket) {
        set(&mut t.title, self.title);
        set(&mut t.description, self.description);
        set(&mut t.category, self.category);
        set(&mut t.priority, self.priority);
        set(&mut t.status, self.status);
        set(&mut t.site_id, self.site_id);
        set(&mut t.location_id, self.location_id);
        set(&mut t.requester_id, self.requester_id);
        set(&mut t.assignee_id, self.assignee_id);
        set(&mut t.due_date, self.due_date);
        set(&mut t.sla_deadline, self.sla_deadline);
        set(&mut t.resolved_at, self.resolved_at);
        set(&mut t.closed_at, self.closed_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ticket {
        Ticket::new(
            "Leaking valve".to_string(),
            "Valve in boiler room drips".to_string(),
            EntityId::new(EntityPrefix::Site),
            EntityId::new(EntityPrefix::Usr),
            Utc::now(),
        )
    }

    #[test]
    fn test_ticket_serializes_camel_case() {
        let t = sample();
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("siteId").is_some());
        assert!(json.get("requesterId").is_some());
        assert_eq!(json["status"], "open");
        // Optional fields are omitted when unset
        assert!(json.get("assigneeId").is_none());
    }

    #[test]
    fn test_patch_leaves_unset_fields() {
        let mut t = sample();
        let before = t.clone();
        TicketPatch {
            title: Some("Leaking valve (urgent)".to_string()),
            ..Default::default()
        }
        .apply(&mut t);
        assert_eq!(t.title, "Leaking valve (urgent)");
        assert_eq!(t.description, before.description);
        assert_eq!(t.status, before.status);
    }

    #[test]
    fn test_patch_clears_optional_field() {
        let mut t = sample();
        t.assignee_id = Some(EntityId::new(EntityPrefix::Usr));
        TicketPatch::assign(None).apply(&mut t);
        assert!(t.assignee_id.is_none());
    }

    #[test]
    fn test_patch_from_json_null_clears() {
        let mut t = sample();
        t.assignee_id = Some(EntityId::new(EntityPrefix::Usr));
        let patch: TicketPatch =
            serde_json::from_str(r#"{"assigneeId": null, "priority": "high"}"#).unwrap();
        patch.apply(&mut t);
        assert!(t.assignee_id.is_none());
        assert_eq!(t.priority, Priority::High);
    }

    #[test]
    fn test_patch_rejects_immutable_fields() {
        let result: Result<TicketPatch, _> =
            serde_json::from_str(r#"{"createdAt": "2024-01-01T00:00:00Z"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_change_stamps_resolution() {
        let now = Utc::now();
        let patch = TicketPatch::status_change(TicketStatus::Resolved, now);
        assert_eq!(patch.resolved_at, Some(Some(now)));
        assert!(patch.closed_at.is_none());
    }

    #[test]
    fn test_status_parse_accepts_dashes() {
        assert_eq!(
            "in-progress".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
    }
}
