//! Demo data used when no snapshot exists yet
//!
//! The seed is fully self-consistent: every id referenced by one entity
//! resolves to an entity in the same aggregate.

use chrono::{DateTime, Duration, Utc};

use crate::core::entity::{EntityType, Priority};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::sla::sla_deadline_for;
use crate::entities::{
    ActivityEvent, ActivityType, AppData, AppSettings, Asset, AssetStatus, ChecklistItem,
    Comment, Location, Notification, NotificationType, PmFrequency, PmPlan, PoStatus,
    PurchaseOrder, Quote, QuoteLine, QuoteStatus, Rfq, RfqStatus, Site, Supplier, Ticket,
    TicketCategory, TicketStatus, User, UserRole, WorkOrder, WorkOrderStatus, WorkOrderType,
    CURRENT_VERSION,
};

/// Produces the initial aggregate
pub trait SeedProducer {
    fn generate(&self) -> AppData;
}

/// Small, realistic data set covering every collection
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoSeed;

impl SeedProducer for DemoSeed {
    fn generate(&self) -> AppData {
        demo_data(Utc::now())
    }
}

/// An empty aggregate. Used where callers want a blank slate.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySeed;

impl SeedProducer for EmptySeed {
    fn generate(&self) -> AppData {
        AppData::empty()
    }
}

fn user(name: &str, email: &str, role: UserRole, site: &EntityId, at: DateTime<Utc>) -> User {
    User {
        id: EntityId::new(EntityPrefix::Usr),
        name: name.to_string(),
        email: email.to_string(),
        role,
        site_id: Some(site.clone()),
        avatar_url: None,
        created_at: at,
    }
}

fn location(site: &EntityId, name: &str, floor: Option<&str>, at: DateTime<Utc>) -> Location {
    Location {
        id: EntityId::new(EntityPrefix::Loc),
        site_id: site.clone(),
        name: name.to_string(),
        floor: floor.map(str::to_string),
        area: None,
        created_at: at,
    }
}

fn supplier(name: &str, email: &str, categories: &[&str], rating: f64, at: DateTime<Utc>) -> Supplier {
    Supplier {
        id: EntityId::new(EntityPrefix::Sup),
        name: name.to_string(),
        email: email.to_string(),
        phone: "+1 555 0100".to_string(),
        address: "1 Industrial Way".to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        rating: Some(rating),
        notes: None,
        created_at: at,
    }
}

/// Build the demo aggregate relative to `now`
pub fn demo_data(now: DateTime<Utc>) -> AppData {
    let start = now - Duration::days(90);
    let today = now.date_naive();
    let settings = AppSettings::default();

    // Sites and locations
    let plant = Site {
        id: EntityId::new(EntityPrefix::Site),
        name: "Riverside Plant".to_string(),
        address: "400 River Rd".to_string(),
        city: "Springfield".to_string(),
        industry: "Manufacturing".to_string(),
        manager_id: None,
        created_at: start,
    };
    let office = Site {
        id: EntityId::new(EntityPrefix::Site),
        name: "Downtown Office".to_string(),
        address: "12 Main St".to_string(),
        city: "Springfield".to_string(),
        industry: "Corporate".to_string(),
        manager_id: None,
        created_at: start,
    };

    let boiler_room = location(&plant.id, "Boiler Room", Some("B1"), start);
    let line_one = location(&plant.id, "Production Line 1", Some("1"), start);
    let server_room = location(&office.id, "Server Room", Some("3"), start);
    let lobby = location(&office.id, "Lobby", Some("G"), start);

    // Users
    let alice = user("Alice Moreno", "alice@example.com", UserRole::Manager, &plant.id, start);
    let ben = user("Ben Okafor", "ben@example.com", UserRole::Technician, &plant.id, start);
    let chen = user("Chen Wei", "chen@example.com", UserRole::Technician, &office.id, start);
    let dana = user("Dana Kowalski", "dana@example.com", UserRole::Dispatcher, &plant.id, start);
    let eli = user("Eli Navarro", "eli@example.com", UserRole::Requester, &office.id, start);

    let mut plant = plant;
    plant.manager_id = Some(alice.id.clone());
    let mut office = office;
    office.manager_id = Some(alice.id.clone());

    // Assets
    let mut boiler = Asset::new(
        "Main Boiler".to_string(),
        "BLR-001".to_string(),
        "HVAC".to_string(),
        plant.id.clone(),
        start,
    );
    boiler.location_id = Some(boiler_room.id.clone());
    boiler.manufacturer = Some("Thermacore".to_string());
    boiler.model = Some("TX-900".to_string());
    boiler.serial_number = Some("TX900-22-4411".to_string());

    let mut conveyor = Asset::new(
        "Conveyor A".to_string(),
        "CNV-001".to_string(),
        "Production".to_string(),
        plant.id.clone(),
        start,
    );
    conveyor.location_id = Some(line_one.id.clone());
    conveyor.status = AssetStatus::Maintenance;

    let mut ups = Asset::new(
        "Server Room UPS".to_string(),
        "UPS-001".to_string(),
        "Electrical".to_string(),
        office.id.clone(),
        start,
    );
    ups.location_id = Some(server_room.id.clone());

    // Tickets
    let mut leak = Ticket::new(
        "Boiler pressure dropping".to_string(),
        "Pressure gauge reads 20% below normal since this morning.".to_string(),
        plant.id.clone(),
        dana.id.clone(),
        now - Duration::hours(7),
    );
    leak.priority = Priority::High;
    leak.status = TicketStatus::InProgress;
    leak.location_id = Some(boiler_room.id.clone());
    leak.assignee_id = Some(ben.id.clone());
    leak.sla_deadline = sla_deadline_for(&settings, leak.priority, leak.created_at);

    let mut badge = Ticket::new(
        "Lobby badge reader offline".to_string(),
        "Visitors cannot badge in at the front desk.".to_string(),
        office.id.clone(),
        eli.id.clone(),
        now - Duration::days(2),
    );
    badge.category = TicketCategory::It;
    badge.location_id = Some(lobby.id.clone());
    badge.sla_deadline = sla_deadline_for(&settings, badge.priority, badge.created_at);

    let mut belt = Ticket::new(
        "Conveyor belt slipping".to_string(),
        "Belt on line 1 slips under load.".to_string(),
        plant.id.clone(),
        dana.id.clone(),
        now - Duration::days(10),
    );
    belt.status = TicketStatus::Resolved;
    belt.assignee_id = Some(ben.id.clone());
    belt.resolved_at = Some(now - Duration::days(8));
    belt.sla_deadline = sla_deadline_for(&settings, belt.priority, belt.created_at);

    // Work orders
    let mut wo_boiler = WorkOrder::new(
        "Inspect boiler pressure valve".to_string(),
        "Check relief valve and gauge calibration.".to_string(),
        plant.id.clone(),
        now - Duration::hours(6),
    );
    wo_boiler.priority = Priority::High;
    wo_boiler.status = WorkOrderStatus::InProgress;
    wo_boiler.asset_id = Some(boiler.id.clone());
    wo_boiler.location_id = boiler.location_id.clone();
    wo_boiler.assignee_id = Some(ben.id.clone());
    wo_boiler.ticket_id = Some(leak.id.clone());
    wo_boiler.scheduled_date = Some(today);
    wo_boiler.checklist = ["Isolate boiler", "Inspect relief valve", "Recalibrate gauge"]
        .iter()
        .map(|d| ChecklistItem {
            id: EntityId::new(EntityPrefix::Item),
            description: d.to_string(),
            completed: false,
            completed_by: None,
            completed_at: None,
        })
        .collect();

    let mut wo_belt = WorkOrder::new(
        "Replace conveyor belt".to_string(),
        "Fit new belt and re-tension.".to_string(),
        plant.id.clone(),
        now - Duration::days(9),
    );
    wo_belt.asset_id = Some(conveyor.id.clone());
    wo_belt.ticket_id = Some(belt.id.clone());
    wo_belt.assignee_id = Some(ben.id.clone());
    wo_belt.status = WorkOrderStatus::Completed;
    wo_belt.completed_at = Some(now - Duration::days(8));
    wo_belt.labor_hours = Some(3.5);

    let mut wo_ups = WorkOrder::new(
        "UPS battery test".to_string(),
        "Quarterly load test of UPS batteries.".to_string(),
        office.id.clone(),
        now - Duration::days(1),
    );
    wo_ups.kind = WorkOrderType::Preventive;
    wo_ups.status = WorkOrderStatus::Scheduled;
    wo_ups.asset_id = Some(ups.id.clone());
    wo_ups.assignee_id = Some(chen.id.clone());
    wo_ups.scheduled_date = today.checked_add_days(chrono::Days::new(3));

    // PM plans
    let pm_boiler = PmPlan {
        id: EntityId::new(EntityPrefix::Pm),
        name: "Boiler monthly service".to_string(),
        description: "Burner inspection and water treatment check.".to_string(),
        asset_id: boiler.id.clone(),
        frequency: PmFrequency::Monthly,
        task_list: vec![
            "Inspect burner".to_string(),
            "Test water chemistry".to_string(),
            "Check flue".to_string(),
        ],
        assignee_id: Some(ben.id.clone()),
        is_active: true,
        last_performed: today.checked_sub_days(chrono::Days::new(26)),
        next_due: today.checked_add_days(chrono::Days::new(4)),
        created_at: start,
        updated_at: start,
    };
    let pm_ups = PmPlan {
        id: EntityId::new(EntityPrefix::Pm),
        name: "UPS quarterly test".to_string(),
        description: "Battery load test and firmware check.".to_string(),
        asset_id: ups.id.clone(),
        frequency: PmFrequency::Quarterly,
        task_list: vec!["Load test".to_string(), "Firmware check".to_string()],
        assignee_id: Some(chen.id.clone()),
        is_active: true,
        last_performed: today.checked_sub_days(chrono::Days::new(87)),
        next_due: today.checked_add_days(chrono::Days::new(3)),
        created_at: start,
        updated_at: start,
    };

    // Procurement
    let acme = supplier("Acme Industrial", "sales@acme.example", &["HVAC", "Plumbing"], 4.5, start);
    let volt = supplier("Volt Electrical", "quotes@volt.example", &["Electrical"], 4.0, start);
    let belts = supplier("BeltWorks", "orders@beltworks.example", &["Production"], 3.5, start);

    let mut rfq = Rfq {
        id: EntityId::new(EntityPrefix::Rfq),
        title: "Boiler relief valve replacement".to_string(),
        description: "Supply and fit a replacement relief valve.".to_string(),
        status: RfqStatus::Quoted,
        site_id: plant.id.clone(),
        requester_id: alice.id.clone(),
        ticket_id: Some(leak.id.clone()),
        due_date: today.checked_add_days(chrono::Days::new(7)),
        supplier_ids: vec![acme.id.clone(), volt.id.clone()],
        created_at: now - Duration::hours(5),
        updated_at: now - Duration::hours(5),
        awarded_quote_id: None,
    };

    let acme_lines = vec![
        QuoteLine::new("Relief valve DN25".to_string(), 1.0, 420.0),
        QuoteLine::new("Installation labour".to_string(), 3.0, 95.0),
    ];
    let acme_subtotal = crate::entities::quote::lines_subtotal(&acme_lines);
    let acme_quote = Quote {
        id: EntityId::new(EntityPrefix::Quot),
        rfq_id: rfq.id.clone(),
        supplier_id: acme.id.clone(),
        subtotal: acme_subtotal,
        tax: acme_subtotal * 0.08,
        total: acme_subtotal * 1.08,
        lines: acme_lines,
        lead_time_days: Some(3),
        notes: None,
        status: QuoteStatus::Submitted,
        valid_until: today.checked_add_days(chrono::Days::new(30)),
        created_at: now - Duration::hours(3),
        updated_at: now - Duration::hours(3),
    };

    let volt_lines = vec![QuoteLine::new("Relief valve DN25 fitted".to_string(), 1.0, 760.0)];
    let volt_subtotal = crate::entities::quote::lines_subtotal(&volt_lines);
    let volt_quote = Quote {
        id: EntityId::new(EntityPrefix::Quot),
        rfq_id: rfq.id.clone(),
        supplier_id: volt.id.clone(),
        subtotal: volt_subtotal,
        tax: volt_subtotal * 0.08,
        total: volt_subtotal * 1.08,
        lines: volt_lines,
        lead_time_days: Some(5),
        notes: Some("Price includes disposal.".to_string()),
        status: QuoteStatus::Submitted,
        valid_until: today.checked_add_days(chrono::Days::new(14)),
        created_at: now - Duration::hours(2),
        updated_at: now - Duration::hours(2),
    };

    let belt_lines = vec![QuoteLine::new("Conveyor belt 12m".to_string(), 1.0, 1250.0)];
    let belt_subtotal = crate::entities::quote::lines_subtotal(&belt_lines);
    let po_belt = PurchaseOrder {
        id: EntityId::new(EntityPrefix::Po),
        po_number: "PO-2024-0001".to_string(),
        rfq_id: None,
        quote_id: None,
        supplier_id: belts.id.clone(),
        site_id: plant.id.clone(),
        requester_id: alice.id.clone(),
        approver_id: Some(alice.id.clone()),
        status: PoStatus::Received,
        subtotal: belt_subtotal,
        tax: belt_subtotal * 0.08,
        total: belt_subtotal * 1.08,
        lines: belt_lines,
        delivery_date: today.checked_sub_days(chrono::Days::new(8)),
        notes: None,
        approval_notes: Some("Urgent, line down.".to_string()),
        created_at: now - Duration::days(10),
        updated_at: now - Duration::days(8),
        approved_at: Some(now - Duration::days(10)),
        sent_at: Some(now - Duration::days(10)),
        received_at: Some(now - Duration::days(8)),
    };

    let po_valve = PurchaseOrder {
        id: EntityId::new(EntityPrefix::Po),
        po_number: "PO-2024-0002".to_string(),
        rfq_id: Some(rfq.id.clone()),
        quote_id: Some(acme_quote.id.clone()),
        supplier_id: acme.id.clone(),
        site_id: plant.id.clone(),
        requester_id: dana.id.clone(),
        approver_id: None,
        status: PoStatus::PendingApproval,
        lines: acme_quote.lines.clone(),
        subtotal: acme_quote.subtotal,
        tax: acme_quote.tax,
        total: acme_quote.total,
        delivery_date: today.checked_add_days(chrono::Days::new(3)),
        notes: None,
        approval_notes: None,
        created_at: now - Duration::hours(1),
        updated_at: now - Duration::hours(1),
        approved_at: None,
        sent_at: None,
        received_at: None,
    };
    rfq.awarded_quote_id = Some(acme_quote.id.clone());
    rfq.status = RfqStatus::Awarded;

    // Annotation log
    let comments = vec![Comment::new(
        EntityType::Ticket,
        leak.id.clone(),
        ben.id.clone(),
        "Relief valve looks worn, raising an RFQ.".to_string(),
        now - Duration::hours(5),
    )];
    let activities = vec![
        ActivityEvent::new(
            EntityType::Ticket,
            leak.id.clone(),
            dana.id.clone(),
            ActivityType::Created,
            "Ticket created",
            leak.created_at,
        ),
        ActivityEvent::new(
            EntityType::Ticket,
            leak.id.clone(),
            dana.id.clone(),
            ActivityType::Assigned,
            format!("Assigned to {}", ben.name),
            leak.created_at + Duration::minutes(10),
        ),
        ActivityEvent::new(
            EntityType::Ticket,
            badge.id.clone(),
            eli.id.clone(),
            ActivityType::Created,
            "Ticket created",
            badge.created_at,
        ),
    ];

    let notifications = vec![
        Notification {
            id: EntityId::new(EntityPrefix::Ntf),
            user_id: ben.id.clone(),
            kind: NotificationType::Assignment,
            title: "New assignment".to_string(),
            message: format!("You were assigned '{}'", leak.title),
            entity_type: Some(EntityType::Ticket.to_string()),
            entity_id: Some(leak.id.clone()),
            read: false,
            created_at: leak.created_at + Duration::minutes(10),
        },
        Notification {
            id: EntityId::new(EntityPrefix::Ntf),
            user_id: alice.id.clone(),
            kind: NotificationType::ApprovalRequest,
            title: "PO awaiting approval".to_string(),
            message: format!("{} needs your approval", po_valve.po_number),
            entity_type: Some(EntityType::Po.to_string()),
            entity_id: Some(po_valve.id.clone()),
            read: false,
            created_at: po_valve.created_at,
        },
        Notification {
            id: EntityId::new(EntityPrefix::Ntf),
            user_id: alice.id.clone(),
            kind: NotificationType::PmDue,
            title: "PM due soon".to_string(),
            message: format!("'{}' is due within a week", pm_boiler.name),
            entity_type: None,
            entity_id: None,
            read: true,
            created_at: now - Duration::days(1),
        },
    ];

    AppData {
        version: CURRENT_VERSION,
        current_user_id: Some(alice.id.clone()),
        users: vec![alice, ben, chen, dana, eli],
        sites: vec![plant, office],
        locations: vec![boiler_room, line_one, server_room, lobby],
        tickets: vec![belt, badge, leak],
        comments,
        activities,
        attachments: Vec::new(),
        assets: vec![boiler, conveyor, ups],
        work_orders: vec![wo_belt, wo_ups, wo_boiler],
        pm_plans: vec![pm_boiler, pm_ups],
        suppliers: vec![acme, volt, belts],
        rfqs: vec![rfq],
        quotes: vec![acme_quote, volt_quote],
        pos: vec![po_belt, po_valve],
        notifications,
        settings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lookup::find;

    #[test]
    fn test_demo_seed_is_current_and_populated() {
        let data = DemoSeed.generate();
        assert_eq!(data.version, CURRENT_VERSION);
        assert!(!data.users.is_empty());
        assert!(!data.sites.is_empty());
        assert!(data.current_user_id.is_some());
    }

    #[test]
    fn test_demo_seed_references_resolve() {
        let data = DemoSeed.generate();
        for t in &data.tickets {
            assert!(find(&data.sites, &t.site_id).is_some());
            assert!(find(&data.users, &t.requester_id).is_some());
            if let Some(a) = &t.assignee_id {
                assert!(find(&data.users, a).is_some());
            }
            if let Some(l) = &t.location_id {
                assert!(find(&data.locations, l).is_some());
            }
        }
        for w in &data.work_orders {
            if let Some(a) = &w.asset_id {
                assert!(find(&data.assets, a).is_some());
            }
            if let Some(t) = &w.ticket_id {
                assert!(find(&data.tickets, t).is_some());
            }
        }
        for p in &data.pm_plans {
            assert!(find(&data.assets, &p.asset_id).is_some());
        }
        for r in &data.rfqs {
            for s in &r.supplier_ids {
                assert!(find(&data.suppliers, s).is_some());
            }
            if let Some(q) = &r.awarded_quote_id {
                let quote = find(&data.quotes, q).unwrap();
                assert_eq!(quote.rfq_id, r.id);
            }
        }
        for po in &data.pos {
            assert!(find(&data.suppliers, &po.supplier_id).is_some());
        }
        for n in &data.notifications {
            assert!(find(&data.users, &n.user_id).is_some());
        }
    }

    #[test]
    fn test_empty_seed() {
        let data = EmptySeed.generate();
        assert!(data.users.is_empty());
        assert_eq!(data.version, CURRENT_VERSION);
    }
}
