//! Work order entity type - scheduled maintenance jobs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{double_option, set, Entity, Patch, Priority};
use crate::core::identity::{EntityId, EntityPrefix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    #[default]
    Draft,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkOrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkOrderStatus::Completed | WorkOrderStatus::Cancelled)
    }
}

impl std::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkOrderStatus::Draft => write!(f, "draft"),
            WorkOrderStatus::Scheduled => write!(f, "scheduled"),
            WorkOrderStatus::InProgress => write!(f, "in_progress"),
            WorkOrderStatus::Completed => write!(f, "completed"),
            WorkOrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for WorkOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "draft" => Ok(WorkOrderStatus::Draft),
            "scheduled" => Ok(WorkOrderStatus::Scheduled),
            "in_progress" => Ok(WorkOrderStatus::InProgress),
            "completed" => Ok(WorkOrderStatus::Completed),
            "cancelled" => Ok(WorkOrderStatus::Cancelled),
            _ => Err(format!(
                "Invalid work order status: {}. Use draft, scheduled, in_progress, completed, or cancelled",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderType {
    #[default]
    Corrective,
    Preventive,
    Inspection,
    Project,
}

impl std::fmt::Display for WorkOrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkOrderType::Corrective => write!(f, "corrective"),
            WorkOrderType::Preventive => write!(f, "preventive"),
            WorkOrderType::Inspection => write!(f, "inspection"),
            WorkOrderType::Project => write!(f, "project"),
        }
    }
}

impl std::str::FromStr for WorkOrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "corrective" => Ok(WorkOrderType::Corrective),
            "preventive" => Ok(WorkOrderType::Preventive),
            "inspection" => Ok(WorkOrderType::Inspection),
            "project" => Ok(WorkOrderType::Project),
            _ => Err(format!(
                "Invalid work order type: {}. Use corrective, preventive, inspection, or project",
                s
            )),
        }
    }
}

/// One step of a work order checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: EntityId,
    pub description: String,
    pub completed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Part consumed while carrying out a work order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartUsed {
    pub id: EntityId,
    pub name: String,
    pub quantity: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: WorkOrderType,
    pub status: WorkOrderStatus,
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<EntityId>,

    pub site_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<EntityId>,

    /// Ticket this work order was raised from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,

    #[serde(default)]
    pub parts_used: Vec<PartUsed>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_hours: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkOrder {
    pub fn new(title: String, description: String, site_id: EntityId, now: DateTime<Utc>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Wo),
            title,
            description,
            kind: WorkOrderType::default(),
            status: WorkOrderStatus::Draft,
            priority: Priority::default(),
            asset_id: None,
            site_id,
            location_id: None,
            assignee_id: None,
            ticket_id: None,
            scheduled_date: None,
            due_date: None,
            checklist: Vec::new(),
            parts_used: Vec::new(),
            labor_hours: None,
            notes: None,
            completion_notes: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Total cost of parts with a known unit cost
    pub fn parts_cost(&self) -> f64 {
        self.parts_used
            .iter()
            .filter_map(|p| p.unit_cost.map(|c| c * p.quantity))
            .sum()
    }
}

impl Entity for WorkOrder {
    const PREFIX: EntityPrefix = EntityPrefix::Wo;

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

/// Partial update for a [`WorkOrder`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkOrderPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<WorkOrderType>,
    #[serde(default)]
    pub status: Option<WorkOrderStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "double_option")]
    pub asset_id: Option<Option<EntityId>>,
    #[serde(default)]
    pub site_id: Option<EntityId>,
    #[serde(default, deserialize_with = "double_option")]
    pub location_id: Option<Option<EntityId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<EntityId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub ticket_id: Option<Option<EntityId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub checklist: Option<Vec<ChecklistItem>>,
    #[serde(default)]
    pub parts_used: Option<Vec<PartUsed>>,
    #[serde(default, deserialize_with = "double_option")]
    pub labor_hours: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub completion_notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl WorkOrderPatch {
    /// Status change; entering `completed` stamps `completedAt`
    pub fn status_change(status: WorkOrderStatus, now: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            completed_at: (status == WorkOrderStatus::Completed).then_some(Some(now)),
            ..Default::default()
        }
    }
}

impl Patch<WorkOrder> for WorkOrderPatch {
    fn apply(self, w: &mut WorkOrder) {
        set(&mut w.title, self.title);
        set(&mut w.description, self.description);
        set(&mut w.kind, self.kind);
        set(&mut w.status, self.status);
        set(&mut w.priority, self.priority);
        set(&mut w.asset_id, self.asset_id);
        set(&mut w.site_id, self.site_id);
        set(&mut w.location_id, self.location_id);
        set(&mut w.assignee_id, self.assignee_id);
        set(&mut w.ticket_id, self.ticket_id);
        set(&mut w.scheduled_date, self.scheduled_date);
        set(&mut w.due_date, self.due_date);
        set(&mut w.checklist, self.checklist);
        set(&mut w.parts_used, self.parts_used);
        set(&mut w.labor_hours, self.labor_hours);
        set(&mut w.notes, self.notes);
        set(&mut w.completion_notes, self.completion_notes);
        set(&mut w.completed_at, self.completed_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_cost_skips_unknown_cost() {
        let mut wo = WorkOrder::new(
            "Replace filter".to_string(),
            String::new(),
            EntityId::new(EntityPrefix::Site),
            Utc::now(),
        );
        wo.parts_used = vec![
            PartUsed {
                id: EntityId::new(EntityPrefix::Item),
                name: "Filter".to_string(),
                quantity: 2.0,
                unit_cost: Some(12.5),
            },
            PartUsed {
                id: EntityId::new(EntityPrefix::Item),
                name: "Gasket".to_string(),
                quantity: 1.0,
                unit_cost: None,
            },
        ];
        assert!((wo.parts_cost() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completion_stamps_completed_at() {
        let now = Utc::now();
        let patch = WorkOrderPatch::status_change(WorkOrderStatus::Completed, now);
        assert_eq!(patch.completed_at, Some(Some(now)));

        let patch = WorkOrderPatch::status_change(WorkOrderStatus::Scheduled, now);
        assert!(patch.completed_at.is_none());
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let wo = WorkOrder::new(
            "Inspect".to_string(),
            String::new(),
            EntityId::new(EntityPrefix::Site),
            Utc::now(),
        );
        let json = serde_json::to_value(&wo).unwrap();
        assert_eq!(json["type"], "corrective");
        assert_eq!(json["checklist"], serde_json::json!([]));
    }
}
