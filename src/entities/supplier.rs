//! Supplier entity type - vendors invited to quote and receive POs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{double_option, set, Entity, Patch};
use crate::core::identity::{EntityId, EntityPrefix};

/// A supplier. Carries no `updatedAt`, so updates leave timestamps alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,

    #[serde(default)]
    pub categories: Vec<String>,

    /// Rating out of 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Entity for Supplier {
    const PREFIX: EntityPrefix = EntityPrefix::Sup;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SupplierPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub rating: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl Patch<Supplier> for SupplierPatch {
    fn apply(self, s: &mut Supplier) {
        set(&mut s.name, self.name);
        set(&mut s.email, self.email);
        set(&mut s.phone, self.phone);
        set(&mut s.address, self.address);
        set(&mut s.categories, self.categories);
        set(&mut s.rating, self.rating);
        set(&mut s.notes, self.notes);
    }
}
