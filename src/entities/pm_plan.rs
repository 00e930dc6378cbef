//! Preventive maintenance plan entity type

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{double_option, set, Entity, Patch};
use crate::core::identity::{EntityId, EntityPrefix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PmFrequency {
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl PmFrequency {
    /// Next occurrence after `from`
    pub fn advance(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            PmFrequency::Weekly => from.checked_add_days(chrono::Days::new(7)),
            PmFrequency::Monthly => from.checked_add_months(Months::new(1)),
            PmFrequency::Quarterly => from.checked_add_months(Months::new(3)),
            PmFrequency::SemiAnnual => from.checked_add_months(Months::new(6)),
            PmFrequency::Annual => from.checked_add_months(Months::new(12)),
        }
    }
}

impl std::fmt::Display for PmFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PmFrequency::Weekly => write!(f, "weekly"),
            PmFrequency::Monthly => write!(f, "monthly"),
            PmFrequency::Quarterly => write!(f, "quarterly"),
            PmFrequency::SemiAnnual => write!(f, "semi_annual"),
            PmFrequency::Annual => write!(f, "annual"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmPlan {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub asset_id: EntityId,
    pub frequency: PmFrequency,

    #[serde(default)]
    pub task_list: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<EntityId>,

    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_performed: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for PmPlan {
    const PREFIX: EntityPrefix = EntityPrefix::Pm;

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
pub struct PmPlanPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub asset_id: Option<EntityId>,
    #[serde(default)]
    pub frequency: Option<PmFrequency>,
    #[serde(default)]
    pub task_list: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<EntityId>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_performed: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub next_due: Option<Option<NaiveDate>>,
}

impl Patch<PmPlan> for PmPlanPatch {
    fn apply(self, p: &mut PmPlan) {
        set(&mut p.name, self.name);
        set(&mut p.description, self.description);
        set(&mut p.asset_id, self.asset_id);
        set(&mut p.frequency, self.frequency);
        set(&mut p.task_list, self.task_list);
        set(&mut p.assignee_id, self.assignee_id);
        set(&mut p.is_active, self.is_active);
        set(&mut p.last_performed, self.last_performed);
        set(&mut p.next_due, self.next_due);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_advance() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            PmFrequency::Weekly.advance(d),
            NaiveDate::from_ymd_opt(2024, 2, 7)
        );
        // Month arithmetic clamps to the end of a shorter month
        assert_eq!(
            PmFrequency::Monthly.advance(d),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            PmFrequency::Annual.advance(d),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );
    }

    #[test]
    fn test_frequency_wire_name() {
        let json = serde_json::to_string(&PmFrequency::SemiAnnual).unwrap();
        assert_eq!(json, "\"semi_annual\"");
    }
}
