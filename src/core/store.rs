//! The live application store
//!
//! Holds the in-memory [`AppData`] aggregate and writes the whole of it
//! through the persistence gateway after every mutation. Mutations take
//! `&mut self`, so there is exactly one writer at a time.

use chrono::{DateTime, Utc};

use crate::core::entity::{Entity, Patch};
use crate::core::identity::EntityId;
use crate::core::lookup;
use crate::core::seed::{DemoSeed, SeedProducer};
use crate::core::snapshot::{Persistence, SnapshotError};
use crate::core::storage::Storage;
use crate::entities::{
    ActivityEvent, AppData, AppSettings, Asset, AssetPatch, Attachment, Comment, Location, Notification,
    PmPlan, PmPlanPatch, PurchaseOrder, PurchaseOrderPatch, Quote, QuotePatch, Rfq, RfqPatch,
    Site, Supplier, SupplierPatch, Ticket, TicketPatch, User, WorkOrder, WorkOrderPatch,
};

/// Merge `patch` into the element with `id` and stamp its modification time.
///
/// Returns whether an element matched. A miss leaves the collection as is.
fn update_in<T, P>(items: &mut [T], id: &EntityId, patch: P, now: DateTime<Utc>) -> bool
where
    T: Entity,
    P: Patch<T>,
{
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            patch.apply(item);
            item.touch(now);
            true
        }
        None => {
            tracing::debug!(%id, "update target not found");
            false
        }
    }
}

/// Remove the element with `id`. References to it elsewhere are left dangling.
fn remove_from<T: Entity>(items: &mut Vec<T>, id: &EntityId) -> bool {
    match lookup::position(items, id) {
        Some(idx) => {
            items.remove(idx);
            true
        }
        None => {
            tracing::debug!(%id, "delete target not found");
            false
        }
    }
}

/// Live aggregate plus the gateway that persists it
#[derive(Debug)]
pub struct Store<S, P = DemoSeed> {
    data: AppData,
    persistence: Persistence<S, P>,
}

impl<S: Storage, P: SeedProducer> Store<S, P> {
    /// Load the aggregate through `persistence` and wrap it
    pub fn open(persistence: Persistence<S, P>) -> Self {
        let data = persistence.load();
        Self { data, persistence }
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn persistence(&self) -> &Persistence<S, P> {
        &self.persistence
    }

    // ---- read access ----

    pub fn users(&self) -> &[User] {
        &self.data.users
    }

    pub fn sites(&self) -> &[Site] {
        &self.data.sites
    }

    pub fn locations(&self) -> &[Location] {
        &self.data.locations
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.data.tickets
    }

    pub fn comments(&self) -> &[Comment] {
        &self.data.comments
    }

    pub fn activities(&self) -> &[ActivityEvent] {
        &self.data.activities
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.data.attachments
    }

    pub fn assets(&self) -> &[Asset] {
        &self.data.assets
    }

    pub fn work_orders(&self) -> &[WorkOrder] {
        &self.data.work_orders
    }

    pub fn pm_plans(&self) -> &[PmPlan] {
        &self.data.pm_plans
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.data.suppliers
    }

    pub fn rfqs(&self) -> &[Rfq] {
        &self.data.rfqs
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.data.quotes
    }

    /// Purchase orders, in insertion order
    pub fn pos(&self) -> &[PurchaseOrder] {
        &self.data.pos
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.data.notifications
    }

    pub fn settings(&self) -> &AppSettings {
        &self.data.settings
    }

    /// Id of the acting user. It may name a user that has since been deleted.
    pub fn current_user_id(&self) -> Option<&EntityId> {
        self.data.current_user_id.as_ref()
    }

    /// Apply `f` to the aggregate, then persist the whole of it
    fn mutate<R>(&mut self, f: impl FnOnce(&mut AppData) -> R) -> R {
        let result = f(&mut self.data);
        self.persistence.save(&self.data);
        result
    }

    /// The user the session acts as, if one is set and still exists
    pub fn current_user(&self) -> Option<&User> {
        self.current_user_id()
            .and_then(|id| lookup::find(&self.data.users, id))
    }

    // ---- tickets ----

    pub fn add_ticket(&mut self, ticket: Ticket) {
        self.mutate(|d| d.tickets.push(ticket));
    }

    pub fn update_ticket(&mut self, id: &EntityId, patch: TicketPatch) -> bool {
        let now = Utc::now();
        self.mutate(|d| update_in(&mut d.tickets, id, patch, now))
    }

    pub fn delete_ticket(&mut self, id: &EntityId) -> bool {
        self.mutate(|d| remove_from(&mut d.tickets, id))
    }

    // ---- annotations ----

    pub fn add_comment(&mut self, comment: Comment) {
        self.mutate(|d| d.comments.push(comment));
    }

    pub fn add_activity(&mut self, activity: ActivityEvent) {
        self.mutate(|d| d.activities.push(activity));
    }

    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.mutate(|d| d.attachments.push(attachment));
    }

    pub fn remove_attachment(&mut self, id: &EntityId) -> bool {
        self.mutate(|d| remove_from(&mut d.attachments, id))
    }

    // ---- assets ----

    pub fn add_asset(&mut self, asset: Asset) {
        self.mutate(|d| d.assets.push(asset));
    }

    pub fn update_asset(&mut self, id: &EntityId, patch: AssetPatch) -> bool {
        let now = Utc::now();
        self.mutate(|d| update_in(&mut d.assets, id, patch, now))
    }

    pub fn delete_asset(&mut self, id: &EntityId) -> bool {
        self.mutate(|d| remove_from(&mut d.assets, id))
    }

    // ---- work orders ----

    pub fn add_work_order(&mut self, work_order: WorkOrder) {
        self.mutate(|d| d.work_orders.push(work_order));
    }

    pub fn update_work_order(&mut self, id: &EntityId, patch: WorkOrderPatch) -> bool {
        let now = Utc::now();
        self.mutate(|d| update_in(&mut d.work_orders, id, patch, now))
    }

    pub fn delete_work_order(&mut self, id: &EntityId) -> bool {
        self.mutate(|d| remove_from(&mut d.work_orders, id))
    }

    // ---- PM plans ----

    pub fn add_pm_plan(&mut self, plan: PmPlan) {
        self.mutate(|d| d.pm_plans.push(plan));
    }

    pub fn update_pm_plan(&mut self, id: &EntityId, patch: PmPlanPatch) -> bool {
        let now = Utc::now();
        self.mutate(|d| update_in(&mut d.pm_plans, id, patch, now))
    }

    pub fn delete_pm_plan(&mut self, id: &EntityId) -> bool {
        self.mutate(|d| remove_from(&mut d.pm_plans, id))
    }

    // ---- procurement ----

    pub fn add_supplier(&mut self, supplier: Supplier) {
        self.mutate(|d| d.suppliers.push(supplier));
    }

    /// Suppliers carry no `updatedAt`; only the patched fields change
    pub fn update_supplier(&mut self, id: &EntityId, patch: SupplierPatch) -> bool {
        let now = Utc::now();
        self.mutate(|d| update_in(&mut d.suppliers, id, patch, now))
    }

    pub fn add_rfq(&mut self, rfq: Rfq) {
        self.mutate(|d| d.rfqs.push(rfq));
    }

    pub fn update_rfq(&mut self, id: &EntityId, patch: RfqPatch) -> bool {
        let now = Utc::now();
        self.mutate(|d| update_in(&mut d.rfqs, id, patch, now))
    }

    pub fn add_quote(&mut self, quote: Quote) {
        self.mutate(|d| d.quotes.push(quote));
    }

    pub fn update_quote(&mut self, id: &EntityId, patch: QuotePatch) -> bool {
        let now = Utc::now();
        self.mutate(|d| update_in(&mut d.quotes, id, patch, now))
    }

    pub fn add_po(&mut self, po: PurchaseOrder) {
        self.mutate(|d| d.pos.push(po));
    }

    pub fn update_po(&mut self, id: &EntityId, patch: PurchaseOrderPatch) -> bool {
        let now = Utc::now();
        self.mutate(|d| update_in(&mut d.pos, id, patch, now))
    }

    // ---- organisation ----

    pub fn add_notification(&mut self, notification: Notification) {
        self.mutate(|d| d.notifications.push(notification));
    }

    pub fn add_site(&mut self, site: Site) {
        self.mutate(|d| d.sites.push(site));
    }

    pub fn add_location(&mut self, location: Location) {
        self.mutate(|d| d.locations.push(location));
    }

    pub fn add_user(&mut self, user: User) {
        self.mutate(|d| d.users.push(user));
    }

    /// Switch the acting user. The id is not checked against `users`.
    pub fn set_current_user(&mut self, id: EntityId) {
        self.mutate(|d| d.current_user_id = Some(id));
    }

    /// Mark one notification read. Read notifications stay read.
    pub fn mark_notification_read(&mut self, id: &EntityId) -> bool {
        self.mutate(|d| match d.notifications.iter_mut().find(|n| &n.id == id) {
            Some(n) => {
                n.mark_read();
                true
            }
            None => false,
        })
    }

    /// Mark every notification read, whoever it is addressed to
    pub fn mark_all_notifications_read(&mut self) {
        self.mutate(|d| d.notifications.iter_mut().for_each(Notification::mark_read));
    }

    // ---- snapshot lifecycle ----

    /// Replace the live aggregate with whatever the gateway loads now
    pub fn reload_data(&mut self) {
        self.data = self.persistence.load();
    }

    /// Import a serialized snapshot and make it live
    pub fn import_snapshot(&mut self, serialized: &str) -> Result<(), SnapshotError> {
        self.persistence.import_snapshot(serialized)?;
        self.reload_data();
        Ok(())
    }

    pub fn export_snapshot(&self) -> Result<String, SnapshotError> {
        self.persistence.export_snapshot()
    }

    /// Throw everything away and start again from the seed
    pub fn reset_to_seed(&mut self) {
        self.data = self.persistence.reset_to_seed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::EntityType;
    use crate::core::identity::EntityPrefix;
    use crate::core::seed::EmptySeed;
    use crate::core::storage::MemoryStorage;
    use crate::entities::{ActivityType, NotificationType, TicketStatus, CURRENT_VERSION};
    use chrono::Duration;

    fn demo_store() -> Store<MemoryStorage> {
        Store::open(Persistence::new(MemoryStorage::new()))
    }

    fn empty_store() -> Store<MemoryStorage, EmptySeed> {
        Store::open(Persistence::with_seed(MemoryStorage::new(), EmptySeed))
    }

    fn notification(user_id: EntityId) -> Notification {
        Notification {
            id: EntityId::new(EntityPrefix::Ntf),
            user_id,
            kind: NotificationType::Assignment,
            title: "Assigned".to_string(),
            message: "You have a new ticket".to_string(),
            entity_type: Some("ticket".to_string()),
            entity_id: None,
            read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_loads_seed() {
        let store = demo_store();
        assert_eq!(store.data().version, CURRENT_VERSION);
        assert!(store.current_user().is_some());
    }

    #[test]
    fn test_read_accessors_track_mutations() {
        let mut store = demo_store();
        assert_eq!(store.tickets(), store.data().tickets.as_slice());
        assert_eq!(store.pos().len(), 2);
        assert_eq!(store.users().len(), 5);
        assert_eq!(store.settings(), &store.data().settings);
        assert_eq!(store.current_user_id(), Some(&store.users()[0].id));

        let site = store.sites()[0].id.clone();
        let user = store.users()[1].id.clone();
        let ticket = Ticket::new("A".into(), "B".into(), site, user.clone(), Utc::now());
        let id = ticket.id.clone();
        store.add_ticket(ticket);
        assert_eq!(store.tickets().last().map(|t| &t.id), Some(&id));

        store.set_current_user(user.clone());
        assert_eq!(store.current_user_id(), Some(&user));
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let mut store = empty_store();
        let writes = store.persistence().storage().write_count();

        let site = EntityId::new(EntityPrefix::Site);
        let user = EntityId::new(EntityPrefix::Usr);
        let ticket = Ticket::new("A".into(), "B".into(), site, user.clone(), Utc::now());
        let id = ticket.id.clone();
        store.add_ticket(ticket);
        store.update_ticket(&id, TicketPatch::assign(Some(user)));
        store.delete_ticket(&id);

        assert_eq!(store.persistence().storage().write_count(), writes + 3);

        let reopened = Store::open(Persistence::with_seed(
            store.persistence().storage(),
            EmptySeed,
        ));
        assert_eq!(reopened.data(), store.data());
    }

    #[test]
    fn test_update_miss_is_noop() {
        let mut store = demo_store();
        let before = store.data().tickets.clone();
        let hit = store.update_ticket(
            &EntityId::new(EntityPrefix::Tkt),
            TicketPatch::status_change(TicketStatus::Closed, Utc::now()),
        );
        assert!(!hit);
        assert_eq!(store.data().tickets, before);
    }

    #[test]
    fn test_update_stamps_updated_at() {
        let mut store = demo_store();
        let id = store.data().tickets[0].id.clone();
        let before = store.data().tickets[0].updated_at;
        let created = store.data().tickets[0].created_at;

        assert!(store.update_ticket(
            &id,
            TicketPatch {
                title: Some("Renamed".to_string()),
                ..Default::default()
            }
        ));

        let after = &store.data().tickets[0];
        assert_eq!(after.title, "Renamed");
        assert!(after.updated_at >= before);
        assert_eq!(after.created_at, created);
        assert_eq!(after.id, id);
    }

    #[test]
    fn test_sequential_updates_are_monotonic() {
        let mut store = demo_store();
        let id = store.data().work_orders[0].id.clone();
        let mut last = store.data().work_orders[0].updated_at;
        for hours in [1.0, 2.0, 3.0] {
            store.update_work_order(
                &id,
                WorkOrderPatch {
                    labor_hours: Some(Some(hours)),
                    ..Default::default()
                },
            );
            let now = store.data().work_orders[0].updated_at;
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_supplier_update_has_no_timestamp() {
        let mut store = demo_store();
        let before = store.data().suppliers[0].clone();
        store.update_supplier(
            &before.id,
            SupplierPatch {
                rating: Some(Some(2.5)),
                ..Default::default()
            },
        );
        let after = &store.data().suppliers[0];
        assert_eq!(after.rating, Some(2.5));
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.name, before.name);
    }

    #[test]
    fn test_delete_asset_does_not_cascade() {
        let mut store = demo_store();
        let (wo_idx, asset_id) = store
            .data()
            .work_orders
            .iter()
            .enumerate()
            .find_map(|(i, wo)| wo.asset_id.clone().map(|a| (i, a)))
            .unwrap();
        let work_orders = store.data().work_orders.len();

        assert!(store.delete_asset(&asset_id));
        assert!(!store.delete_asset(&asset_id));

        let data = store.data();
        assert_eq!(data.work_orders.len(), work_orders);
        let dangling = data.work_orders[wo_idx].asset_id.as_ref();
        assert_eq!(lookup::asset_name(data, dangling), lookup::UNKNOWN);
    }

    #[test]
    fn test_mark_notification_read_is_idempotent() {
        let mut store = empty_store();
        let n = notification(EntityId::new(EntityPrefix::Usr));
        let id = n.id.clone();
        store.add_notification(n);

        assert!(store.mark_notification_read(&id));
        let once = store.data().clone();
        assert!(store.mark_notification_read(&id));
        assert_eq!(store.data(), &once);
        assert!(store.data().notifications[0].read);

        assert!(!store.mark_notification_read(&EntityId::new(EntityPrefix::Ntf)));
    }

    #[test]
    fn test_mark_all_read_ignores_recipient() {
        let mut store = empty_store();
        store.add_notification(notification(EntityId::new(EntityPrefix::Usr)));
        store.add_notification(notification(EntityId::new(EntityPrefix::Usr)));
        store.mark_all_notifications_read();
        assert!(store.data().notifications.iter().all(|n| n.read));
    }

    #[test]
    fn test_set_current_user_unchecked() {
        let mut store = empty_store();
        let ghost = EntityId::new(EntityPrefix::Usr);
        store.set_current_user(ghost.clone());
        assert_eq!(store.data().current_user_id.as_ref(), Some(&ghost));
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_annotations_append_in_order() {
        let mut store = empty_store();
        let owner = EntityId::new(EntityPrefix::Tkt);
        let user = EntityId::new(EntityPrefix::Usr);
        let now = Utc::now();
        for (i, kind) in [ActivityType::Created, ActivityType::Assigned].into_iter().enumerate() {
            store.add_activity(ActivityEvent::new(
                EntityType::Ticket,
                owner.clone(),
                user.clone(),
                kind,
                format!("event {}", i),
                now + Duration::seconds(i as i64),
            ));
        }
        let events: Vec<_> =
            lookup::for_entity(&store.data().activities, EntityType::Ticket, &owner).collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].description, "event 0");
        assert_eq!(events[1].kind, ActivityType::Assigned);
    }

    #[test]
    fn test_import_reloads_live_data() {
        let mut source = demo_store();
        let exported = source.export_snapshot().unwrap();
        source.reset_to_seed();

        let mut target = empty_store();
        target.import_snapshot(&exported).unwrap();
        assert_eq!(target.data().users.len(), source.data().users.len());

        assert!(target.import_snapshot("{broken").is_err());
        assert!(!target.data().users.is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let mut store = empty_store();
        store.persistence().storage().fail_writes(true);
        let site = EntityId::new(EntityPrefix::Site);
        let user = EntityId::new(EntityPrefix::Usr);
        store.add_ticket(Ticket::new("A".into(), "B".into(), site, user, Utc::now()));
        assert_eq!(store.data().tickets.len(), 1);
    }
}
