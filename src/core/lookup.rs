//! Read-side resolution of id references
//!
//! References between entities are never validated on write, so any lookup
//! may miss. Misses resolve to display placeholders instead of errors.

use crate::core::entity::{Entity, EntityType};
use crate::core::identity::EntityId;
use crate::entities::{Annotation, AppData, Notification, Rfq};

pub const UNKNOWN: &str = "Unknown";
pub const UNASSIGNED: &str = "Unassigned";
pub const NOT_AVAILABLE: &str = "N/A";

/// Find an entity by id in a collection
pub fn find<'a, T: Entity>(items: &'a [T], id: &EntityId) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Position of an entity in its collection
pub fn position<T: Entity>(items: &[T], id: &EntityId) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Name of a user, or "Unknown" when the id does not resolve
pub fn user_name<'a>(data: &'a AppData, id: &EntityId) -> &'a str {
    find(&data.users, id).map_or(UNKNOWN, |u| u.name.as_str())
}

/// Name of an optional assignee: "Unassigned" when unset, "Unknown" when dangling
pub fn assignee_name<'a>(data: &'a AppData, id: Option<&EntityId>) -> &'a str {
    match id {
        None => UNASSIGNED,
        Some(id) => user_name(data, id),
    }
}

pub fn site_name<'a>(data: &'a AppData, id: &EntityId) -> &'a str {
    find(&data.sites, id).map_or(UNKNOWN, |s| s.name.as_str())
}

pub fn location_name<'a>(data: &'a AppData, id: Option<&EntityId>) -> &'a str {
    id.and_then(|id| find(&data.locations, id))
        .map_or(NOT_AVAILABLE, |l| l.name.as_str())
}

pub fn asset_name<'a>(data: &'a AppData, id: Option<&EntityId>) -> &'a str {
    match id {
        None => NOT_AVAILABLE,
        Some(id) => find(&data.assets, id).map_or(UNKNOWN, |a| a.name.as_str()),
    }
}

pub fn supplier_name<'a>(data: &'a AppData, id: &EntityId) -> &'a str {
    find(&data.suppliers, id).map_or(UNKNOWN, |s| s.name.as_str())
}

/// Display an optional value, "N/A" when unset
pub fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Annotations (comments, activities, attachments) owned by one entity,
/// in insertion order
pub fn for_entity<'a, A: Annotation>(
    items: &'a [A],
    entity_type: EntityType,
    id: &'a EntityId,
) -> impl Iterator<Item = &'a A> + 'a {
    items
        .iter()
        .filter(move |a| a.owner_type() == entity_type && a.owner_id() == id)
}

/// Notifications addressed to `user_id`
pub fn notifications_for<'a>(
    notifications: &'a [Notification],
    user_id: &'a EntityId,
) -> impl Iterator<Item = &'a Notification> + 'a {
    notifications.iter().filter(move |n| &n.user_id == user_id)
}

/// Unread notification count for `user_id`
pub fn unread_count(notifications: &[Notification], user_id: &EntityId) -> usize {
    notifications_for(notifications, user_id)
        .filter(|n| !n.read)
        .count()
}

/// Whether an RFQ's awarded quote (if any) exists and belongs to that RFQ
pub fn awarded_quote_is_consistent(data: &AppData, rfq: &Rfq) -> bool {
    match &rfq.awarded_quote_id {
        None => true,
        Some(qid) => find(&data.quotes, qid).is_some_and(|q| q.rfq_id == rfq.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;
    use crate::core::seed::demo_data;
    use chrono::Utc;

    #[test]
    fn test_placeholders() {
        let data = demo_data(Utc::now());
        let missing = EntityId::new(EntityPrefix::Usr);
        assert_eq!(user_name(&data, &missing), UNKNOWN);
        assert_eq!(assignee_name(&data, None), UNASSIGNED);
        assert_eq!(assignee_name(&data, Some(&missing)), UNKNOWN);
        assert_eq!(asset_name(&data, None), NOT_AVAILABLE);
        assert_eq!(
            asset_name(&data, Some(&EntityId::new(EntityPrefix::Ast))),
            UNKNOWN
        );
        assert_eq!(site_name(&data, &EntityId::new(EntityPrefix::Site)), UNKNOWN);
        assert_eq!(or_na(None::<String>), "N/A");
        assert_eq!(or_na(Some(3)), "3");
    }

    #[test]
    fn test_resolves_existing() {
        let data = demo_data(Utc::now());
        let u = &data.users[0];
        assert_eq!(user_name(&data, &u.id), u.name);
    }

    #[test]
    fn test_for_entity_filters_by_owner() {
        let data = demo_data(Utc::now());
        let ticket = data
            .tickets
            .iter()
            .find(|t| for_entity(&data.activities, EntityType::Ticket, &t.id).count() > 0)
            .unwrap();
        for a in for_entity(&data.activities, EntityType::Ticket, &ticket.id) {
            assert_eq!(a.entity_id, ticket.id);
        }
        // Same id under another owner type matches nothing
        assert_eq!(for_entity(&data.activities, EntityType::Po, &ticket.id).count(), 0);
    }

    #[test]
    fn test_awarded_quote_consistency() {
        let mut data = demo_data(Utc::now());
        let rfq = data.rfqs[0].clone();
        assert!(awarded_quote_is_consistent(&data, &rfq));

        // Point the quote at another RFQ
        data.quotes.iter_mut().for_each(|q| q.rfq_id = EntityId::new(EntityPrefix::Rfq));
        assert!(!awarded_quote_is_consistent(&data, &rfq));
    }
}
