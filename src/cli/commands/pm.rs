//! `ophub pm` command - Preventive maintenance plans

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::{open_store, print_json, resolve, short_ref};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup;
use crate::entities::PmPlan;

#[derive(Subcommand, Debug)]
pub enum PmCommands {
    /// List PM plans
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Include paused plans
    #[arg(long)]
    pub all: bool,

    /// Only plans for this asset (ID or AST@N)
    #[arg(long)]
    pub asset: Option<String>,

    /// Only plans due within this many days (overdue plans included)
    #[arg(long)]
    pub due_within: Option<i64>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

pub fn run(cmd: PmCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PmCommands::List(args) => run_list(args, global),
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "NAME"),
    ColumnDef::new("asset", "ASSET"),
    ColumnDef::new("frequency", "FREQUENCY"),
    ColumnDef::new("last", "LAST DONE"),
    ColumnDef::new("next", "NEXT DUE"),
    ColumnDef::new("assignee", "ASSIGNEE"),
    ColumnDef::new("active", "ACTIVE"),
];

fn is_due_within(next_due: Option<NaiveDate>, today: NaiveDate, days: i64) -> bool {
    next_due.is_some_and(|d| (d - today).num_days() <= days)
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();
    let today = Local::now().date_naive();
    let asset_id = match args.asset.as_deref() {
        Some(reference) => Some(resolve(&data.assets, reference)?.id.clone()),
        None => None,
    };

    let plans: Vec<(usize, &PmPlan)> = data
        .pm_plans
        .iter()
        .enumerate()
        .filter(|(_, p)| args.all || p.is_active)
        .filter(|(_, p)| asset_id.as_ref().map_or(true, |id| &p.asset_id == id))
        .filter(|(_, p)| {
            args.due_within
                .map_or(true, |days| is_due_within(p.next_due, today, days))
        })
        .collect();

    if args.count {
        println!("{}", plans.len());
        return Ok(());
    }

    if global.format == OutputFormat::Json {
        let list: Vec<&PmPlan> = plans.iter().map(|(_, p)| *p).collect();
        return print_json(&list);
    }

    let rows = plans.iter().map(|(idx, p)| {
        TableRow::new(short_ref::<PmPlan>(*idx))
            .cell("name", CellValue::Text(p.name.clone()))
            .cell(
                "asset",
                CellValue::Text(lookup::asset_name(data, Some(&p.asset_id)).to_string()),
            )
            .cell("frequency", CellValue::Text(p.frequency.to_string()))
            .cell("last", CellValue::Date(p.last_performed))
            .cell("next", CellValue::Date(p.next_due))
            .cell(
                "assignee",
                CellValue::Text(lookup::assignee_name(data, p.assignee_id.as_ref()).to_string()),
            )
            .cell(
                "active",
                CellValue::Text(if p.is_active { "yes" } else { "no" }.to_string()),
            )
    });

    TableFormatter::new(COLUMNS, "PM plan", "PM")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_within_includes_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(is_due_within(NaiveDate::from_ymd_opt(2024, 3, 1), today, 7));
        assert!(is_due_within(NaiveDate::from_ymd_opt(2024, 3, 17), today, 7));
        assert!(!is_due_within(NaiveDate::from_ymd_opt(2024, 3, 18), today, 7));
        assert!(!is_due_within(None, today, 7));
    }
}
