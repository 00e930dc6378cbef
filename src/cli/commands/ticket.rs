//! `ophub ticket` command - Service desk tickets

use chrono::{NaiveDate, Utc};
use clap::{Subcommand, ValueEnum};
use console::style;
use miette::Result;

use crate::cli::helpers::{
    acting_user, confirm, format_short_id, open_store, print_json, resolve, short_ref, success,
    HubStore,
};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::{EntityType, Priority};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::lookup;
use crate::core::sla::{sla_deadline_for, sla_status, SlaStatus};
use crate::entities::{
    ActivityEvent, ActivityType, Comment, Notification, NotificationType, Ticket,
    TicketCategory, TicketPatch, TicketStatus,
};

#[derive(Subcommand, Debug)]
pub enum TicketCommands {
    /// List tickets with filtering
    List(ListArgs),

    /// Show a ticket with its comments and activity
    Show(ShowArgs),

    /// Raise a new ticket
    New(NewArgs),

    /// Change a ticket's status
    Status(StatusArgs),

    /// Assign a ticket to a user, or clear the assignee
    Assign(AssignArgs),

    /// Add a comment to a ticket
    Comment(CommentArgs),

    /// Apply a partial update given as JSON
    Update(UpdateArgs),

    /// Delete a ticket
    Delete(DeleteArgs),
}

/// SLA filter
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SlaFilter {
    Ok,
    Warning,
    Overdue,
    /// Warning or overdue
    AtRisk,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<TicketStatus>,

    /// Filter by priority
    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,

    /// Filter by SLA standing
    #[arg(long)]
    pub sla: Option<SlaFilter>,

    /// Only tickets assigned to the current user
    #[arg(long)]
    pub mine: bool,

    /// Search in title and description
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Ticket ID or short ID (TKT@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Ticket title (required)
    #[arg(long, short = 't')]
    pub title: String,

    /// Longer description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    #[arg(long, short = 'c', default_value = "maintenance")]
    pub category: TicketCategory,

    #[arg(long, short = 'p', default_value = "medium")]
    pub priority: Priority,

    /// Site ID or short ID (default: configured site, else the first site)
    #[arg(long)]
    pub site: Option<String>,

    /// Location ID or short ID
    #[arg(long)]
    pub location: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<NaiveDate>,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Ticket ID or short ID (TKT@N)
    pub id: String,

    /// New status
    pub status: TicketStatus,
}

#[derive(clap::Args, Debug)]
pub struct AssignArgs {
    /// Ticket ID or short ID (TKT@N)
    pub id: String,

    /// User ID or short ID (USR@N); omit to unassign
    pub user: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct CommentArgs {
    /// Ticket ID or short ID (TKT@N)
    pub id: String,

    /// Comment text
    pub text: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Ticket ID or short ID (TKT@N)
    pub id: String,

    /// Fields to change as a JSON object, e.g. '{"priority":"high","assigneeId":null}'
    #[arg(long)]
    pub json: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Ticket ID or short ID (TKT@N)
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run a ticket subcommand
pub fn run(cmd: TicketCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TicketCommands::List(args) => run_list(args, global),
        TicketCommands::Show(args) => run_show(args, global),
        TicketCommands::New(args) => run_new(args, global),
        TicketCommands::Status(args) => run_status(args, global),
        TicketCommands::Assign(args) => run_assign(args, global),
        TicketCommands::Comment(args) => run_comment(args, global),
        TicketCommands::Update(args) => run_update(args, global),
        TicketCommands::Delete(args) => run_delete(args, global),
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("title", "TITLE"),
    ColumnDef::new("status", "STATUS"),
    ColumnDef::new("priority", "PRIORITY"),
    ColumnDef::new("sla", "SLA"),
    ColumnDef::new("assignee", "ASSIGNEE"),
    ColumnDef::new("site", "SITE"),
    ColumnDef::new("created", "CREATED"),
];

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();
    let now = Utc::now();
    let me = store.current_user().map(|u| u.id.clone());

    let mut tickets: Vec<(usize, &Ticket)> = data
        .tickets
        .iter()
        .enumerate()
        .filter(|(_, t)| args.status.map_or(true, |s| t.status == s))
        .filter(|(_, t)| args.priority.map_or(true, |p| t.priority == p))
        .filter(|(_, t)| {
            args.sla.map_or(true, |filter| {
                let sla = sla_status(t.sla_deadline, &t.status, now);
                match filter {
                    SlaFilter::Ok => sla == SlaStatus::Ok,
                    SlaFilter::Warning => sla == SlaStatus::Warning,
                    SlaFilter::Overdue => sla == SlaStatus::Overdue,
                    SlaFilter::AtRisk => sla != SlaStatus::Ok,
                }
            })
        })
        .filter(|(_, t)| !args.mine || (me.is_some() && t.assignee_id == me))
        .filter(|(_, t)| {
            args.search.as_ref().map_or(true, |search| {
                let search = search.to_lowercase();
                t.title.to_lowercase().contains(&search)
                    || t.description.to_lowercase().contains(&search)
            })
        })
        .collect();

    if let Some(limit) = args.limit {
        tickets.truncate(limit);
    }

    if args.count {
        println!("{}", tickets.len());
        return Ok(());
    }

    if global.format == OutputFormat::Json {
        let list: Vec<&Ticket> = tickets.iter().map(|(_, t)| *t).collect();
        return print_json(&list);
    }

    let rows = tickets.iter().map(|(idx, t)| {
        TableRow::new(short_ref::<Ticket>(*idx))
            .cell("title", CellValue::Text(t.title.clone()))
            .cell("status", CellValue::Status(t.status.to_string()))
            .cell("priority", CellValue::Priority(t.priority))
            .cell("sla", CellValue::Sla(sla_status(t.sla_deadline, &t.status, now)))
            .cell(
                "assignee",
                CellValue::Text(lookup::assignee_name(data, t.assignee_id.as_ref()).to_string()),
            )
            .cell("site", CellValue::Text(lookup::site_name(data, &t.site_id).to_string()))
            .cell("created", CellValue::DateTime(t.created_at))
    });

    TableFormatter::new(COLUMNS, "ticket", "TKT")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();
    let t = resolve(&data.tickets, &args.id)?;
    let now = Utc::now();

    if global.format == OutputFormat::Json {
        return print_json(t);
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&t.id).cyan());
    println!("{}: {}", style("Title").bold(), style(&t.title).yellow());
    println!("{}: {}", style("Status").bold(), t.status);
    println!("{}: {}", style("Priority").bold(), t.priority);
    println!("{}: {}", style("Category").bold(), t.category);
    let sla = sla_status(t.sla_deadline, &t.status, now);
    println!(
        "{}: {} ({})",
        style("SLA deadline").bold(),
        lookup::or_na(t.sla_deadline.map(|d| d.format("%Y-%m-%d %H:%M UTC"))),
        CellValue::Sla(sla).display()
    );
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Site").bold(), lookup::site_name(data, &t.site_id));
    println!(
        "{}: {}",
        style("Location").bold(),
        lookup::location_name(data, t.location_id.as_ref())
    );
    println!(
        "{}: {}",
        style("Requester").bold(),
        lookup::user_name(data, &t.requester_id)
    );
    println!(
        "{}: {}",
        style("Assignee").bold(),
        lookup::assignee_name(data, t.assignee_id.as_ref())
    );
    println!("{}: {}", style("Due").bold(), lookup::or_na(t.due_date));

    if !t.description.is_empty() {
        println!();
        println!("{}", t.description);
    }

    let comments: Vec<_> = lookup::for_entity(&data.comments, EntityType::Ticket, &t.id).collect();
    if !comments.is_empty() {
        println!();
        println!("{} ({}):", style("Comments").bold(), comments.len());
        for c in comments {
            println!(
                "  {} {} {}",
                style(c.created_at.format("%Y-%m-%d %H:%M")).dim(),
                style(lookup::user_name(data, &c.user_id)).cyan(),
                c.content
            );
        }
    }

    let activity: Vec<_> =
        lookup::for_entity(&data.activities, EntityType::Ticket, &t.id).collect();
    if !activity.is_empty() {
        println!();
        println!("{}:", style("Activity").bold());
        for a in activity {
            println!(
                "  {} {} {}",
                style(a.created_at.format("%Y-%m-%d %H:%M")).dim(),
                lookup::user_name(data, &a.user_id),
                a.description
            );
        }
    }

    println!();
    println!(
        "{}: {}  {}: {}",
        style("Created").dim(),
        t.created_at.format("%Y-%m-%d %H:%M"),
        style("Updated").dim(),
        t.updated_at.format("%Y-%m-%d %H:%M")
    );

    Ok(())
}

/// Site for a new ticket: explicit choice, else the configured site, else the first one
fn pick_site(store: &HubStore, requested: Option<&str>) -> Result<EntityId> {
    if let Some(reference) = requested {
        return Ok(resolve(store.sites(), reference)?.id.clone());
    }
    store
        .settings()
        .site_id
        .clone()
        .or_else(|| store.sites().first().map(|s| s.id.clone()))
        .ok_or_else(|| miette::miette!("No sites exist. Pass --site with a site ID."))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let requester = acting_user(&store)?;
    let site_id = pick_site(&store, args.site.as_deref())?;
    let location_id = match args.location.as_deref() {
        Some(reference) => Some(resolve(store.locations(), reference)?.id.clone()),
        None => None,
    };

    let now = Utc::now();
    let mut ticket = Ticket::new(args.title, args.description, site_id, requester.clone(), now);
    ticket.category = args.category;
    ticket.priority = args.priority;
    ticket.location_id = location_id;
    ticket.due_date = args.due;
    ticket.sla_deadline = sla_deadline_for(&store.data().settings, args.priority, now);

    let id = ticket.id.clone();
    let title = ticket.title.clone();
    let deadline = ticket.sla_deadline;
    store.add_ticket(ticket);
    store.add_activity(ActivityEvent::new(
        EntityType::Ticket,
        id.clone(),
        requester,
        ActivityType::Created,
        "Ticket created",
        now,
    ));

    let short = short_ref::<Ticket>(store.data().tickets.len() - 1);
    success(global, format!("Created ticket {}", style(&short).cyan()));
    if !global.quiet {
        println!("   ID: {}", style(&id).dim());
        println!("   Title: {}", style(&title).yellow());
        if let Some(deadline) = deadline {
            println!("   SLA deadline: {}", deadline.format("%Y-%m-%d %H:%M UTC"));
        }
    }
    Ok(())
}

fn run_status(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let user = acting_user(&store)?;
    let (id, from) = {
        let t = resolve(store.tickets(), &args.id)?;
        (t.id.clone(), t.status)
    };

    let now = Utc::now();
    store.update_ticket(&id, TicketPatch::status_change(args.status, now));

    let mut event = ActivityEvent::new(
        EntityType::Ticket,
        id.clone(),
        user,
        ActivityType::StatusChanged,
        format!("Status changed to {}", args.status),
        now,
    );
    let mut metadata = serde_json::Map::new();
    metadata.insert("from".to_string(), from.to_string().into());
    metadata.insert("to".to_string(), args.status.to_string().into());
    event.metadata = Some(metadata);
    store.add_activity(event);

    success(
        global,
        format!("{} {} → {}", format_short_id(&id), from, style(args.status).cyan()),
    );
    Ok(())
}

fn run_assign(args: AssignArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let user = acting_user(&store)?;
    let (id, title) = {
        let t = resolve(store.tickets(), &args.id)?;
        (t.id.clone(), t.title.clone())
    };
    let assignee = match args.user.as_deref() {
        Some(reference) => {
            let u = resolve(store.users(), reference)?;
            Some((u.id.clone(), u.name.clone()))
        }
        None => None,
    };

    let now = Utc::now();
    store.update_ticket(&id, TicketPatch::assign(assignee.as_ref().map(|(uid, _)| uid.clone())));

    let description = match &assignee {
        Some((_, name)) => format!("Assigned to {}", name),
        None => "Unassigned".to_string(),
    };
    store.add_activity(ActivityEvent::new(
        EntityType::Ticket,
        id.clone(),
        user,
        ActivityType::Assigned,
        description.clone(),
        now,
    ));

    if let Some((uid, _)) = &assignee {
        store.add_notification(Notification {
            id: EntityId::new(EntityPrefix::Ntf),
            user_id: uid.clone(),
            kind: NotificationType::Assignment,
            title: "Ticket assigned".to_string(),
            message: format!("You have been assigned: {}", title),
            entity_type: Some(EntityType::Ticket.to_string()),
            entity_id: Some(id.clone()),
            read: false,
            created_at: now,
        });
    }

    success(global, format!("{}: {}", format_short_id(&id), description));
    Ok(())
}

fn run_comment(args: CommentArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let user = acting_user(&store)?;
    let id = resolve(store.tickets(), &args.id)?.id.clone();

    if args.text.trim().is_empty() {
        return Err(miette::miette!("Comment text is empty"));
    }

    let now = Utc::now();
    store.add_comment(Comment::new(
        EntityType::Ticket,
        id.clone(),
        user.clone(),
        args.text,
        now,
    ));
    store.add_activity(ActivityEvent::new(
        EntityType::Ticket,
        id.clone(),
        user,
        ActivityType::Commented,
        "Added a comment",
        now,
    ));

    success(global, format!("Comment added to {}", format_short_id(&id)));
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let user = acting_user(&store)?;
    let id = resolve(store.tickets(), &args.id)?.id.clone();
    let patch: TicketPatch = serde_json::from_str(&args.json)
        .map_err(|e| miette::miette!("Invalid ticket patch: {}", e))?;

    store.update_ticket(&id, patch);
    store.add_activity(ActivityEvent::new(
        EntityType::Ticket,
        id.clone(),
        user,
        ActivityType::Updated,
        "Ticket updated",
        Utc::now(),
    ));

    success(global, format!("Updated {}", format_short_id(&id)));
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let (id, title) = {
        let t = resolve(store.tickets(), &args.id)?;
        (t.id.clone(), t.title.clone())
    };

    if !confirm(&format!("Delete ticket '{}'?", title), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    store.delete_ticket(&id);
    success(global, format!("Deleted {}", format_short_id(&id)));
    Ok(())
}
