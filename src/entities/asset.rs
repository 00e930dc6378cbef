//! Asset entity type - equipment and infrastructure under maintenance

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{double_option, set, Entity, Patch};
use crate::core::identity::{EntityId, EntityPrefix};

/// Asset operating status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    #[default]
    Operational,
    Maintenance,
    Offline,
    Decommissioned,
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetStatus::Operational => write!(f, "operational"),
            AssetStatus::Maintenance => write!(f, "maintenance"),
            AssetStatus::Offline => write!(f, "offline"),
            AssetStatus::Decommissioned => write!(f, "decommissioned"),
        }
    }
}

impl std::str::FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "operational" => Ok(AssetStatus::Operational),
            "maintenance" => Ok(AssetStatus::Maintenance),
            "offline" => Ok(AssetStatus::Offline),
            "decommissioned" => Ok(AssetStatus::Decommissioned),
            _ => Err(format!(
                "Invalid asset status: {}. Use operational, maintenance, offline, or decommissioned",
                s
            )),
        }
    }
}

/// A tracked piece of equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: EntityId,
    pub name: String,

    /// Human-facing tag printed on the equipment label
    pub asset_tag: String,

    pub category: String,
    pub site_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<EntityId>,

    pub status: AssetStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_expiry: Option<NaiveDate>,

    pub qr_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    pub fn new(
        name: String,
        asset_tag: String,
        category: String,
        site_id: EntityId,
        now: DateTime<Utc>,
    ) -> Self {
        let qr_code = qr_code_for(&asset_tag);
        Self {
            id: EntityId::new(EntityPrefix::Ast),
            name,
            asset_tag,
            category,
            site_id,
            location_id: None,
            status: AssetStatus::Operational,
            manufacturer: None,
            model: None,
            serial_number: None,
            purchase_date: None,
            warranty_expiry: None,
            qr_code,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// QR payload for an asset tag: `QR-` followed by the upper-cased tag with
/// whitespace replaced by dashes
pub fn qr_code_for(text: &str) -> String {
    let body: String = text
        .to_uppercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    format!("QR-{}", body)
}

impl Entity for Asset {
    const PREFIX: EntityPrefix = EntityPrefix::Ast;

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

/// Partial update for an [`Asset`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssetPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub asset_tag: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub site_id: Option<EntityId>,
    #[serde(default, deserialize_with = "double_option")]
    pub location_id: Option<Option<EntityId>>,
    #[serde(default)]
    pub status: Option<AssetStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub manufacturer: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub model: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub serial_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub purchase_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub warranty_expiry: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl Patch<Asset> for AssetPatch {
    fn apply(self, a: &mut Asset) {
        set(&mut a.name, self.name);
        set(&mut a.asset_tag, self.asset_tag);
        set(&mut a.category, self.category);
        set(&mut a.site_id, self.site_id);
        set(&mut a.location_id, self.location_id);
        set(&mut a.status, self.status);
        set(&mut a.manufacturer, self.manufacturer);
        set(&mut a.model, self.model);
        set(&mut a.serial_number, self.serial_number);
        set(&mut a.purchase_date, self.purchase_date);
        set(&mut a.warranty_expiry, self.warranty_expiry);
        set(&mut a.qr_code, self.qr_code);
        set(&mut a.notes, self.notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_code_for() {
        assert_eq!(qr_code_for("hvac 01"), "QR-HVAC-01");
        assert_eq!(qr_code_for("AST-0042"), "QR-AST-0042");
    }

    #[test]
    fn test_new_asset_is_operational() {
        let asset = Asset::new(
            "Chiller".to_string(),
            "CH-1".to_string(),
            "HVAC".to_string(),
            EntityId::new(EntityPrefix::Site),
            Utc::now(),
        );
        assert_eq!(asset.status, AssetStatus::Operational);
        assert_eq!(asset.qr_code, "QR-CH-1");
        assert_eq!(asset.created_at, asset.updated_at);
    }
}
