//! `ophub wo` command - Work orders

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{
    acting_user, confirm, format_short_id, open_store, print_json, resolve, short_ref, success,
};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::{EntityType, Priority};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::lookup;
use crate::entities::{
    ActivityEvent, ActivityType, ChecklistItem, WorkOrder, WorkOrderPatch, WorkOrderStatus,
    WorkOrderType,
};

#[derive(Subcommand, Debug)]
pub enum WoCommands {
    /// List work orders with filtering
    List(ListArgs),

    /// Show a work order with its checklist and parts
    Show(ShowArgs),

    /// Create a work order
    New(NewArgs),

    /// Change a work order's status
    Status(StatusArgs),

    /// Delete a work order
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<WorkOrderStatus>,

    /// Filter by type
    #[arg(long = "type", short = 't')]
    pub kind: Option<WorkOrderType>,

    /// Only work orders against this asset (ID or AST@N)
    #[arg(long)]
    pub asset: Option<String>,

    /// Only work orders assigned to the current user
    #[arg(long)]
    pub mine: bool,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Work order ID or short ID (WO@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Work order title (required)
    #[arg(long)]
    pub title: String,

    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    #[arg(long = "type", short = 't', default_value = "corrective")]
    pub kind: WorkOrderType,

    #[arg(long, short = 'p', default_value = "medium")]
    pub priority: Priority,

    /// Asset ID or short ID (AST@N); the site defaults to the asset's site
    #[arg(long)]
    pub asset: Option<String>,

    /// Site ID or short ID
    #[arg(long)]
    pub site: Option<String>,

    /// Assignee user ID or short ID (USR@N)
    #[arg(long)]
    pub assignee: Option<String>,

    /// Ticket this work order is raised from (ID or TKT@N)
    #[arg(long)]
    pub ticket: Option<String>,

    /// Scheduled date (YYYY-MM-DD)
    #[arg(long)]
    pub scheduled: Option<NaiveDate>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<NaiveDate>,

    /// Checklist step; repeat for several
    #[arg(long = "step")]
    pub steps: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Work order ID or short ID (WO@N)
    pub id: String,

    /// New status
    pub status: WorkOrderStatus,

    /// Hours of labour booked
    #[arg(long)]
    pub labor_hours: Option<f64>,

    /// Completion notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Work order ID or short ID (WO@N)
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run a work order subcommand
pub fn run(cmd: WoCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        WoCommands::List(args) => run_list(args, global),
        WoCommands::Show(args) => run_show(args, global),
        WoCommands::New(args) => run_new(args, global),
        WoCommands::Status(args) => run_status(args, global),
        WoCommands::Delete(args) => run_delete(args, global),
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("title", "TITLE"),
    ColumnDef::new("type", "TYPE"),
    ColumnDef::new("status", "STATUS"),
    ColumnDef::new("priority", "PRIORITY"),
    ColumnDef::new("asset", "ASSET"),
    ColumnDef::new("assignee", "ASSIGNEE"),
    ColumnDef::new("due", "DUE"),
];

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();
    let me = store.current_user().map(|u| u.id.clone());
    let asset_id = match args.asset.as_deref() {
        Some(reference) => Some(resolve(&data.assets, reference)?.id.clone()),
        None => None,
    };

    let work_orders: Vec<(usize, &WorkOrder)> = data
        .work_orders
        .iter()
        .enumerate()
        .filter(|(_, w)| args.status.map_or(true, |s| w.status == s))
        .filter(|(_, w)| args.kind.map_or(true, |k| w.kind == k))
        .filter(|(_, w)| asset_id.is_none() || w.asset_id == asset_id)
        .filter(|(_, w)| !args.mine || (me.is_some() && w.assignee_id == me))
        .collect();

    if args.count {
        println!("{}", work_orders.len());
        return Ok(());
    }

    if global.format == OutputFormat::Json {
        let list: Vec<&WorkOrder> = work_orders.iter().map(|(_, w)| *w).collect();
        return print_json(&list);
    }

    let rows = work_orders.iter().map(|(idx, w)| {
        TableRow::new(short_ref::<WorkOrder>(*idx))
            .cell("title", CellValue::Text(w.title.clone()))
            .cell("type", CellValue::Text(w.kind.to_string()))
            .cell("status", CellValue::Status(w.status.to_string()))
            .cell("priority", CellValue::Priority(w.priority))
            .cell(
                "asset",
                CellValue::Text(lookup::asset_name(data, w.asset_id.as_ref()).to_string()),
            )
            .cell(
                "assignee",
                CellValue::Text(lookup::assignee_name(data, w.assignee_id.as_ref()).to_string()),
            )
            .cell("due", CellValue::Date(w.due_date))
    });

    TableFormatter::new(COLUMNS, "work order", "WO")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();
    let w = resolve(&data.work_orders, &args.id)?;

    if global.format == OutputFormat::Json {
        return print_json(w);
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&w.id).cyan());
    println!("{}: {}", style("Title").bold(), style(&w.title).yellow());
    println!("{}: {}", style("Type").bold(), w.kind);
    println!("{}: {}", style("Status").bold(), w.status);
    println!("{}: {}", style("Priority").bold(), w.priority);
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Asset").bold(), lookup::asset_name(data, w.asset_id.as_ref()));
    println!("{}: {}", style("Site").bold(), lookup::site_name(data, &w.site_id));
    println!(
        "{}: {}",
        style("Assignee").bold(),
        lookup::assignee_name(data, w.assignee_id.as_ref())
    );
    if let Some(ref ticket_id) = w.ticket_id {
        let title = lookup::find(&data.tickets, ticket_id).map_or(lookup::UNKNOWN, |t| t.title.as_str());
        println!("{}: {}", style("From ticket").bold(), title);
    }
    println!("{}: {}", style("Scheduled").bold(), lookup::or_na(w.scheduled_date));
    println!("{}: {}", style("Due").bold(), lookup::or_na(w.due_date));
    println!("{}: {}", style("Labour hours").bold(), lookup::or_na(w.labor_hours));

    if !w.description.is_empty() {
        println!();
        println!("{}", w.description);
    }

    if !w.checklist.is_empty() {
        let done = w.checklist.iter().filter(|c| c.completed).count();
        println!();
        println!("{} ({}/{}):", style("Checklist").bold(), done, w.checklist.len());
        for item in &w.checklist {
            let mark = if item.completed {
                style("✓").green()
            } else {
                style("○").dim()
            };
            println!("  {} {}", mark, item.description);
        }
    }

    if !w.parts_used.is_empty() {
        println!();
        println!("{}:", style("Parts used").bold());
        for part in &w.parts_used {
            println!(
                "  • {} × {} ({})",
                part.quantity,
                part.name,
                lookup::or_na(part.unit_cost.map(|c| format!("${:.2}", c)))
            );
        }
        println!("  {}: ${:.2}", style("Parts cost").dim(), w.parts_cost());
    }

    if let Some(ref notes) = w.completion_notes {
        println!();
        println!("{}: {}", style("Completion notes").bold(), notes);
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let user = acting_user(&store)?;
    let data = store.data();

    let asset = match args.asset.as_deref() {
        Some(reference) => Some(resolve(&data.assets, reference)?),
        None => None,
    };
    let site_id = match (args.site.as_deref(), asset) {
        (Some(reference), _) => resolve(&data.sites, reference)?.id.clone(),
        (None, Some(a)) => a.site_id.clone(),
        (None, None) => data
            .sites
            .first()
            .map(|s| s.id.clone())
            .ok_or_else(|| miette::miette!("No sites exist. Pass --site with a site ID."))?,
    };
    let assignee_id = match args.assignee.as_deref() {
        Some(reference) => Some(resolve(&data.users, reference)?.id.clone()),
        None => None,
    };
    let ticket_id = match args.ticket.as_deref() {
        Some(reference) => Some(resolve(&data.tickets, reference)?.id.clone()),
        None => None,
    };

    let now = Utc::now();
    let mut wo = WorkOrder::new(args.title, args.description, site_id, now);
    wo.kind = args.kind;
    wo.priority = args.priority;
    wo.asset_id = asset.map(|a| a.id.clone());
    wo.location_id = asset.and_then(|a| a.location_id.clone());
    wo.assignee_id = assignee_id;
    wo.ticket_id = ticket_id;
    wo.scheduled_date = args.scheduled;
    wo.due_date = args.due;
    if wo.scheduled_date.is_some() {
        wo.status = WorkOrderStatus::Scheduled;
    }
    wo.checklist = args
        .steps
        .into_iter()
        .map(|description| ChecklistItem {
            id: EntityId::new(EntityPrefix::Item),
            description,
            completed: false,
            completed_by: None,
            completed_at: None,
        })
        .collect();

    let id = wo.id.clone();
    store.add_work_order(wo);
    store.add_activity(ActivityEvent::new(
        EntityType::WorkOrder,
        id.clone(),
        user,
        ActivityType::Created,
        "Work order created",
        now,
    ));

    let short = short_ref::<WorkOrder>(store.data().work_orders.len() - 1);
    success(global, format!("Created work order {}", style(&short).cyan()));
    if !global.quiet {
        println!("   ID: {}", style(&id).dim());
    }
    Ok(())
}

fn run_status(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let user = acting_user(&store)?;
    let (id, from) = {
        let w = resolve(store.work_orders(), &args.id)?;
        (w.id.clone(), w.status)
    };

    let now = Utc::now();
    let mut patch = WorkOrderPatch::status_change(args.status, now);
    if let Some(hours) = args.labor_hours {
        patch.labor_hours = Some(Some(hours));
    }
    if let Some(notes) = args.notes {
        patch.completion_notes = Some(Some(notes));
    }
    store.update_work_order(&id, patch);
    store.add_activity(ActivityEvent::new(
        EntityType::WorkOrder,
        id.clone(),
        user,
        ActivityType::StatusChanged,
        format!("Status changed to {}", args.status),
        now,
    ));

    success(
        global,
        format!("{} {} → {}", format_short_id(&id), from, style(args.status).cyan()),
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let (id, title) = {
        let w = resolve(store.work_orders(), &args.id)?;
        (w.id.clone(), w.title.clone())
    };

    if !confirm(&format!("Delete work order '{}'?", title), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    store.delete_work_order(&id);
    success(global, format!("Deleted {}", format_short_id(&id)));
    Ok(())
}
