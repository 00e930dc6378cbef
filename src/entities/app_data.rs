//! The root aggregate holding every entity collection

use serde::{Deserialize, Serialize};

use crate::core::identity::EntityId;
use crate::entities::{
    ActivityEvent, AppSettings, Asset, Attachment, Comment, Location, Notification, PmPlan,
    PurchaseOrder, Quote, Rfq, Site, Supplier, Ticket, User, WorkOrder,
};

/// Schema version written by this build
pub const CURRENT_VERSION: u32 = 1;

/// Everything the application knows, serialized as one snapshot document.
///
/// Collections keep insertion order. References between entities are plain
/// ids and are never checked; see [`crate::core::lookup`] for resolving them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default)]
    pub version: u32,
    pub users: Vec<User>,
    pub sites: Vec<Site>,
    pub locations: Vec<Location>,
    pub tickets: Vec<Ticket>,
    pub comments: Vec<Comment>,
    pub activities: Vec<ActivityEvent>,
    pub attachments: Vec<Attachment>,
    pub assets: Vec<Asset>,
    pub work_orders: Vec<WorkOrder>,
    pub pm_plans: Vec<PmPlan>,
    pub suppliers: Vec<Supplier>,
    pub rfqs: Vec<Rfq>,
    pub quotes: Vec<Quote>,
    pub pos: Vec<PurchaseOrder>,
    pub notifications: Vec<Notification>,
    pub settings: AppSettings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user_id: Option<EntityId>,
}

impl AppData {
    /// An empty aggregate at the current version with default settings
    pub fn empty() -> Self {
        Self {
            version: CURRENT_VERSION,
            users: Vec::new(),
            sites: Vec::new(),
            locations: Vec::new(),
            tickets: Vec::new(),
            comments: Vec::new(),
            activities: Vec::new(),
            attachments: Vec::new(),
            assets: Vec::new(),
            work_orders: Vec::new(),
            pm_plans: Vec::new(),
            suppliers: Vec::new(),
            rfqs: Vec::new(),
            quotes: Vec::new(),
            pos: Vec::new(),
            notifications: Vec::new(),
            settings: AppSettings::default(),
            current_user_id: None,
        }
    }
}

impl Default for AppData {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_keys_are_camel_case() {
        let json = serde_json::to_value(AppData::empty()).unwrap();
        for key in ["workOrders", "pmPlans", "pos", "notifications", "settings"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(json["version"], CURRENT_VERSION);
        assert!(json.get("currentUserId").is_none());
    }

    #[test]
    fn test_missing_collection_is_rejected() {
        let result: Result<AppData, _> = serde_json::from_str(r#"{"version": 1, "users": []}"#);
        assert!(result.is_err());
    }
}
