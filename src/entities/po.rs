//! Purchase order entity type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{double_option, set, Entity, Patch};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::quote::QuoteLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PoStatus {
    #[default]
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Sent,
    Received,
    Cancelled,
}

impl PoStatus {
    /// Statuses that count as committed spend
    pub fn is_committed(&self) -> bool {
        matches!(self, PoStatus::Approved | PoStatus::Sent | PoStatus::Received)
    }
}

impl std::fmt::Display for PoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoStatus::Draft => write!(f, "draft"),
            PoStatus::PendingApproval => write!(f, "pending_approval"),
            PoStatus::Approved => write!(f, "approved"),
            PoStatus::Rejected => write!(f, "rejected"),
            PoStatus::Sent => write!(f, "sent"),
            PoStatus::Received => write!(f, "received"),
            PoStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: EntityId,
    pub po_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfq_id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<EntityId>,

    pub supplier_id: EntityId,
    pub site_id: EntityId,
    pub requester_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_id: Option<EntityId>,

    pub status: PoStatus,

    #[serde(default)]
    pub lines: Vec<QuoteLine>,

    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

impl Entity for PurchaseOrder {
    const PREFIX: EntityPrefix = EntityPrefix::Po;

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

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PurchaseOrderPatch {
    #[serde(default)]
    pub po_number: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub rfq_id: Option<Option<EntityId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub quote_id: Option<Option<EntityId>>,
    #[serde(default)]
    pub supplier_id: Option<EntityId>,
    #[serde(default)]
    pub site_id: Option<EntityId>,
    #[serde(default)]
    pub requester_id: Option<EntityId>,
    #[serde(default, deserialize_with = "double_option")]
    pub approver_id: Option<Option<EntityId>>,
    #[serde(default)]
    pub status: Option<PoStatus>,
    #[serde(default)]
    pub lines: Option<Vec<QuoteLine>>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub delivery_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub approval_notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub approved_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub sent_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub received_at: Option<Option<DateTime<Utc>>>,
}

impl PurchaseOrderPatch {
    /// Approve, recording who approved and when
    pub fn approve(approver_id: EntityId, notes: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            status: Some(PoStatus::Approved),
            approver_id: Some(Some(approver_id)),
            approval_notes: notes.map(Some),
            approved_at: Some(Some(now)),
            ..Default::default()
        }
    }
}

impl Patch<PurchaseOrder> for PurchaseOrderPatch {
    fn apply(self, p: &mut PurchaseOrder) {
        set(&mut p.po_number, self.po_number);
        set(&mut p.rfq_id, self.rfq_id);
        set(&mut p.quote_id, self.quote_id);
        set(&mut p.supplier_id, self.supplier_id);
        set(&mut p.site_id, self.site_id);
        set(&mut p.requester_id, self.requester_id);
        set(&mut p.approver_id, self.approver_id);
        set(&mut p.status, self.status);
        set(&mut p.lines, self.lines);
        set(&mut p.subtotal, self.subtotal);
        set(&mut p.tax, self.tax);
        set(&mut p.total, self.total);
        set(&mut p.delivery_date, self.delivery_date);
        set(&mut p.notes, self.notes);
        set(&mut p.approval_notes, self.approval_notes);
        set(&mut p.approved_at, self.approved_at);
        set(&mut p.sent_at, self.sent_at);
        set(&mut p.received_at, self.received_at);
    }
}
