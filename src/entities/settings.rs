//! Application settings: SLA policies and defaults

use serde::{Deserialize, Serialize};

use crate::core::entity::Priority;
use crate::core::identity::EntityId;

/// Response and resolution targets for one ticket priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaPolicy {
    pub priority: Priority,
    pub response_minutes: i64,
    pub resolution_minutes: i64,
}

/// Singleton configuration stored inside the aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<EntityId>,

    #[serde(default)]
    pub sla_enabled: bool,

    #[serde(default)]
    pub sla_policies: Vec<SlaPolicy>,
}

impl AppSettings {
    /// Policy for a priority, if one is configured
    pub fn policy_for(&self, priority: Priority) -> Option<&SlaPolicy> {
        self.sla_policies.iter().find(|p| p.priority == priority)
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            site_id: None,
            sla_enabled: true,
            sla_policies: vec![
                SlaPolicy {
                    priority: Priority::Critical,
                    response_minutes: 15,
                    resolution_minutes: 4 * 60,
                },
                SlaPolicy {
                    priority: Priority::High,
                    response_minutes: 60,
                    resolution_minutes: 8 * 60,
                },
                SlaPolicy {
                    priority: Priority::Medium,
                    response_minutes: 4 * 60,
                    resolution_minutes: 24 * 60,
                },
                SlaPolicy {
                    priority: Priority::Low,
                    response_minutes: 8 * 60,
                    resolution_minutes: 72 * 60,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_policy_per_priority() {
        let settings = AppSettings::default();
        for p in [Priority::Low, Priority::Medium, Priority::High, Priority::Critical] {
            assert!(settings.policy_for(p).is_some(), "missing policy for {}", p);
        }
    }

    #[test]
    fn test_settings_json_shape() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
        assert_eq!(json["slaEnabled"], true);
        assert!(json["slaPolicies"][0].get("resolutionMinutes").is_some());
    }
}
