//! RFQ entity type - requests for quotation sent to suppliers

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{double_option, set, Entity, Patch};
use crate::core::identity::{EntityId, EntityPrefix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RfqStatus {
    #[default]
    Draft,
    Sent,
    Quoted,
    Awarded,
    Cancelled,
}

impl std::fmt::Display for RfqStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RfqStatus::Draft => write!(f, "draft"),
            RfqStatus::Sent => write!(f, "sent"),
            RfqStatus::Quoted => write!(f, "quoted"),
            RfqStatus::Awarded => write!(f, "awarded"),
            RfqStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Request for quotation.
///
/// `awarded_quote_id`, once set, should point at a quote whose `rfq_id` is
/// this RFQ. The store does not check this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rfq {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub status: RfqStatus,
    pub site_id: EntityId,
    pub requester_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub supplier_ids: Vec<EntityId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awarded_quote_id: Option<EntityId>,
}

impl Entity for Rfq {
    const PREFIX: EntityPrefix = EntityPrefix::Rfq;

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
pub struct RfqPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<RfqStatus>,
    #[serde(default)]
    pub site_id: Option<EntityId>,
    #[serde(default)]
    pub requester_id: Option<EntityId>,
    #[serde(default, deserialize_with = "double_option")]
    pub ticket_id: Option<Option<EntityId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub supplier_ids: Option<Vec<EntityId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub awarded_quote_id: Option<Option<EntityId>>,
}

impl RfqPatch {
    /// Award the RFQ to a quote
    pub fn award(quote_id: EntityId) -> Self {
        Self {
            status: Some(RfqStatus::Awarded),
            awarded_quote_id: Some(Some(quote_id)),
            ..Default::default()
        }
    }
}

impl Patch<Rfq> for RfqPatch {
    fn apply(self, r: &mut Rfq) {
        set(&mut r.title, self.title);
        set(&mut r.description, self.description);
        set(&mut r.status, self.status);
        set(&mut r.site_id, self.site_id);
        set(&mut r.requester_id, self.requester_id);
        set(&mut r.ticket_id, self.ticket_id);
        set(&mut r.due_date, self.due_date);
        set(&mut r.supplier_ids, self.supplier_ids);
        set(&mut r.awarded_quote_id, self.awarded_quote_id);
    }
}
