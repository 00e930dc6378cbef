//! Quote entity type - supplier responses to an RFQ

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{double_option, set, Entity, Patch};
use crate::core::identity::{EntityId, EntityPrefix};

/// Priced line on a quote or purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub id: EntityId,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

impl QuoteLine {
    pub fn new(description: String, quantity: f64, unit_price: f64) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Item),
            description,
            quantity,
            unit_price,
            total: quantity * unit_price,
        }
    }
}

/// Sum of line totals. Totals on quotes and POs are computed by whoever
/// builds them; the store accepts whatever it is given.
pub fn lines_subtotal(lines: &[QuoteLine]) -> f64 {
    lines.iter().map(|l| l.total).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Submitted,
    Accepted,
    Rejected,
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteStatus::Pending => write!(f, "pending"),
            QuoteStatus::Submitted => write!(f, "submitted"),
            QuoteStatus::Accepted => write!(f, "accepted"),
            QuoteStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: EntityId,
    pub rfq_id: EntityId,
    pub supplier_id: EntityId,

    #[serde(default)]
    pub lines: Vec<QuoteLine>,

    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub status: QuoteStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Quote {
    const PREFIX: EntityPrefix = EntityPrefix::Quot;

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
pub struct QuotePatch {
    #[serde(default)]
    pub rfq_id: Option<EntityId>,
    #[serde(default)]
    pub supplier_id: Option<EntityId>,
    #[serde(default)]
    pub lines: Option<Vec<QuoteLine>>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub lead_time_days: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<QuoteStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub valid_until: Option<Option<NaiveDate>>,
}

impl Patch<Quote> for QuotePatch {
    fn apply(self, q: &mut Quote) {
        set(&mut q.rfq_id, self.rfq_id);
        set(&mut q.supplier_id, self.supplier_id);
        set(&mut q.lines, self.lines);
        set(&mut q.subtotal, self.subtotal);
        set(&mut q.tax, self.tax);
        set(&mut q.total, self.total);
        set(&mut q.lead_time_days, self.lead_time_days);
        set(&mut q.notes, self.notes);
        set(&mut q.status, self.status);
        set(&mut q.valid_until, self.valid_until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_and_subtotal() {
        let lines = vec![
            QuoteLine::new("Pump seal".to_string(), 4.0, 25.0),
            QuoteLine::new("Labour".to_string(), 2.0, 80.0),
        ];
        assert_eq!(lines[0].total, 100.0);
        assert_eq!(lines_subtotal(&lines), 260.0);
    }
}
