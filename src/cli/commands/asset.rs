//! `ophub asset` command - Asset register

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{
    acting_user, confirm, format_short_id, open_store, print_json, resolve, short_ref, success,
};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::EntityType;
use crate::core::lookup;
use crate::entities::{
    ActivityEvent, ActivityType, Asset, AssetPatch, AssetStatus, PmPlan, WorkOrder,
};

#[derive(Subcommand, Debug)]
pub enum AssetCommands {
    /// List assets with filtering
    List(ListArgs),

    /// Show an asset with its work orders and PM plans
    Show(ShowArgs),

    /// Register a new asset
    New(NewArgs),

    /// Change fields of an asset
    Update(UpdateArgs),

    /// Delete an asset (work orders and PM plans keep their reference)
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<AssetStatus>,

    /// Filter by category (exact, case-insensitive)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Search in name, tag and serial number
    #[arg(long)]
    pub search: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Asset ID or short ID (AST@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Asset name (required)
    #[arg(long, short = 'n')]
    pub name: String,

    /// Asset tag printed on the label (required)
    #[arg(long, short = 't')]
    pub tag: String,

    /// Category, e.g. HVAC or Electrical
    #[arg(long, short = 'c', default_value = "General")]
    pub category: String,

    /// Site ID or short ID (default: first site)
    #[arg(long)]
    pub site: Option<String>,

    /// Location ID or short ID
    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub manufacturer: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub serial: Option<String>,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    pub purchased: Option<NaiveDate>,

    /// Warranty expiry (YYYY-MM-DD)
    #[arg(long)]
    pub warranty: Option<NaiveDate>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Asset ID or short ID (AST@N)
    pub id: String,

    #[arg(long, short = 's')]
    pub status: Option<AssetStatus>,

    #[arg(long, short = 'n')]
    pub name: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Further fields as a JSON object; flags win where both set a field
    #[arg(long)]
    pub json: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Asset ID or short ID (AST@N)
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run an asset subcommand
pub fn run(cmd: AssetCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AssetCommands::List(args) => run_list(args, global),
        AssetCommands::Show(args) => run_show(args, global),
        AssetCommands::New(args) => run_new(args, global),
        AssetCommands::Update(args) => run_update(args, global),
        AssetCommands::Delete(args) => run_delete(args, global),
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "NAME"),
    ColumnDef::new("tag", "TAG"),
    ColumnDef::new("category", "CATEGORY"),
    ColumnDef::new("status", "STATUS"),
    ColumnDef::new("site", "SITE"),
    ColumnDef::new("location", "LOCATION"),
];

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();

    let assets: Vec<(usize, &Asset)> = data
        .assets
        .iter()
        .enumerate()
        .filter(|(_, a)| args.status.map_or(true, |s| a.status == s))
        .filter(|(_, a)| {
            args.category
                .as_ref()
                .map_or(true, |c| a.category.eq_ignore_ascii_case(c))
        })
        .filter(|(_, a)| {
            args.search.as_ref().map_or(true, |search| {
                let search = search.to_lowercase();
                a.name.to_lowercase().contains(&search)
                    || a.asset_tag.to_lowercase().contains(&search)
                    || a.serial_number
                        .as_ref()
                        .is_some_and(|s| s.to_lowercase().contains(&search))
            })
        })
        .collect();

    if args.count {
        println!("{}", assets.len());
        return Ok(());
    }

    if global.format == OutputFormat::Json {
        let list: Vec<&Asset> = assets.iter().map(|(_, a)| *a).collect();
        return print_json(&list);
    }

    let rows = assets.iter().map(|(idx, a)| {
        TableRow::new(short_ref::<Asset>(*idx))
            .cell("name", CellValue::Text(a.name.clone()))
            .cell("tag", CellValue::Text(a.asset_tag.clone()))
            .cell("category", CellValue::Text(a.category.clone()))
            .cell("status", CellValue::Status(a.status.to_string()))
            .cell("site", CellValue::Text(lookup::site_name(data, &a.site_id).to_string()))
            .cell(
                "location",
                CellValue::Text(lookup::location_name(data, a.location_id.as_ref()).to_string()),
            )
    });

    TableFormatter::new(COLUMNS, "asset", "AST")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();
    let a = resolve(&data.assets, &args.id)?;

    if global.format == OutputFormat::Json {
        return print_json(a);
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&a.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&a.name).yellow());
    println!("{}: {}", style("Tag").bold(), a.asset_tag);
    println!("{}: {}", style("QR").bold(), a.qr_code);
    println!("{}: {}", style("Status").bold(), CellValue::Status(a.status.to_string()).display());
    println!("{}: {}", style("Category").bold(), a.category);
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Site").bold(), lookup::site_name(data, &a.site_id));
    println!(
        "{}: {}",
        style("Location").bold(),
        lookup::location_name(data, a.location_id.as_ref())
    );
    println!("{}: {}", style("Manufacturer").bold(), lookup::or_na(a.manufacturer.as_ref()));
    println!("{}: {}", style("Model").bold(), lookup::or_na(a.model.as_ref()));
    println!("{}: {}", style("Serial").bold(), lookup::or_na(a.serial_number.as_ref()));
    println!("{}: {}", style("Purchased").bold(), lookup::or_na(a.purchase_date));
    println!("{}: {}", style("Warranty until").bold(), lookup::or_na(a.warranty_expiry));
    if let Some(ref notes) = a.notes {
        println!();
        println!("{}", notes);
    }

    let work_orders: Vec<&WorkOrder> = data
        .work_orders
        .iter()
        .filter(|w| w.asset_id.as_ref() == Some(&a.id))
        .collect();
    if !work_orders.is_empty() {
        println!();
        println!("{} ({}):", style("Work orders").bold(), work_orders.len());
        for wo in work_orders {
            println!("  • {} [{}]", wo.title, wo.status);
        }
    }

    let plans: Vec<&PmPlan> = data.pm_plans.iter().filter(|p| p.asset_id == a.id).collect();
    if !plans.is_empty() {
        println!();
        println!("{} ({}):", style("PM plans").bold(), plans.len());
        for p in plans {
            println!(
                "  • {} ({}, next due {})",
                p.name,
                p.frequency,
                lookup::or_na(p.next_due)
            );
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let user = acting_user(&store)?;
    let data = store.data();

    let site_id = match args.site.as_deref() {
        Some(reference) => resolve(&data.sites, reference)?.id.clone(),
        None => data
            .sites
            .first()
            .map(|s| s.id.clone())
            .ok_or_else(|| miette::miette!("No sites exist. Pass --site with a site ID."))?,
    };
    let location_id = match args.location.as_deref() {
        Some(reference) => Some(resolve(&data.locations, reference)?.id.clone()),
        None => None,
    };

    let now = Utc::now();
    let mut asset = Asset::new(args.name, args.tag, args.category, site_id, now);
    asset.location_id = location_id;
    asset.manufacturer = args.manufacturer;
    asset.model = args.model;
    asset.serial_number = args.serial;
    asset.purchase_date = args.purchased;
    asset.warranty_expiry = args.warranty;
    asset.notes = args.notes;

    let id = asset.id.clone();
    let qr = asset.qr_code.clone();
    store.add_asset(asset);
    store.add_activity(ActivityEvent::new(
        EntityType::Asset,
        id.clone(),
        user,
        ActivityType::Created,
        "Asset registered",
        now,
    ));

    let short = short_ref::<Asset>(store.data().assets.len() - 1);
    success(global, format!("Created asset {}", style(&short).cyan()));
    if !global.quiet {
        println!("   ID: {}", style(&id).dim());
        println!("   QR: {}", qr);
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let user = acting_user(&store)?;
    let id = resolve(store.assets(), &args.id)?.id.clone();

    let mut patch: AssetPatch = match args.json.as_deref() {
        Some(json) => serde_json::from_str(json)
            .map_err(|e| miette::miette!("Invalid asset patch: {}", e))?,
        None => AssetPatch::default(),
    };
    if args.status.is_some() {
        patch.status = args.status;
    }
    if args.name.is_some() {
        patch.name = args.name;
    }
    if let Some(notes) = args.notes {
        patch.notes = Some(Some(notes));
    }

    store.update_asset(&id, patch);
    store.add_activity(ActivityEvent::new(
        EntityType::Asset,
        id.clone(),
        user,
        ActivityType::Updated,
        "Asset updated",
        Utc::now(),
    ));

    success(global, format!("Updated {}", format_short_id(&id)));
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let (id, name) = {
        let a = resolve(store.assets(), &args.id)?;
        (a.id.clone(), a.name.clone())
    };

    let referencing = store
        .data()
        .work_orders
        .iter()
        .filter(|w| w.asset_id.as_ref() == Some(&id))
        .count()
        + store.data().pm_plans.iter().filter(|p| p.asset_id == id).count();

    if referencing > 0 && !global.quiet {
        println!(
            "{} {} work order(s) and PM plan(s) still reference this asset.",
            style("!").yellow(),
            referencing
        );
    }

    if !confirm(&format!("Delete asset '{}'?", name), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    store.delete_asset(&id);
    success(global, format!("Deleted {}", format_short_id(&id)));
    Ok(())
}
