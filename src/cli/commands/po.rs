//! `ophub po` command - Purchase orders

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::Result;

use crate::cli::helpers::{open_store, print_json, short_ref};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup;
use crate::entities::{PoStatus, PurchaseOrder};

#[derive(Subcommand, Debug)]
pub enum PoCommands {
    /// List purchase orders
    List(ListArgs),
}

/// Status filter
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StatusFilter {
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Sent,
    Received,
    Cancelled,
    /// Approved, sent or received
    Committed,
    All,
}

impl StatusFilter {
    fn matches(self, status: PoStatus) -> bool {
        match self {
            StatusFilter::Draft => status == PoStatus::Draft,
            StatusFilter::PendingApproval => status == PoStatus::PendingApproval,
            StatusFilter::Approved => status == PoStatus::Approved,
            StatusFilter::Rejected => status == PoStatus::Rejected,
            StatusFilter::Sent => status == PoStatus::Sent,
            StatusFilter::Received => status == PoStatus::Received,
            StatusFilter::Cancelled => status == PoStatus::Cancelled,
            StatusFilter::Committed => status.is_committed(),
            StatusFilter::All => true,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', default_value = "all")]
    pub status: StatusFilter,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

pub fn run(cmd: PoCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PoCommands::List(args) => run_list(args, global),
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("number", "PO #"),
    ColumnDef::new("supplier", "SUPPLIER"),
    ColumnDef::new("status", "STATUS"),
    ColumnDef::new("total", "TOTAL"),
    ColumnDef::new("requester", "REQUESTER"),
    ColumnDef::new("delivery", "DELIVERY"),
];

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();

    let orders: Vec<(usize, &PurchaseOrder)> = data
        .pos
        .iter()
        .enumerate()
        .filter(|(_, po)| args.status.matches(po.status))
        .collect();

    if args.count {
        println!("{}", orders.len());
        return Ok(());
    }

    if global.format == OutputFormat::Json {
        let list: Vec<&PurchaseOrder> = orders.iter().map(|(_, po)| *po).collect();
        return print_json(&list);
    }

    let committed: f64 = orders
        .iter()
        .filter(|(_, po)| po.status.is_committed())
        .map(|(_, po)| po.total)
        .sum();

    let rows = orders.iter().map(|(idx, po)| {
        TableRow::new(short_ref::<PurchaseOrder>(*idx))
            .cell("number", CellValue::Text(po.po_number.clone()))
            .cell(
                "supplier",
                CellValue::Text(lookup::supplier_name(data, &po.supplier_id).to_string()),
            )
            .cell("status", CellValue::Status(po.status.to_string()))
            .cell("total", CellValue::Money(po.total))
            .cell(
                "requester",
                CellValue::Text(lookup::user_name(data, &po.requester_id).to_string()),
            )
            .cell("delivery", CellValue::Date(po.delivery_date))
    });

    TableFormatter::new(COLUMNS, "purchase order", "PO")
        .quiet(global.quiet)
        .output(rows, global.format);

    if global.format == OutputFormat::Auto && !global.quiet && !orders.is_empty() {
        println!(
            "Committed spend in view: {}",
            style(format!("${:.2}", committed)).cyan()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_committed_filter() {
        assert!(StatusFilter::Committed.matches(PoStatus::Approved));
        assert!(StatusFilter::Committed.matches(PoStatus::Received));
        assert!(!StatusFilter::Committed.matches(PoStatus::PendingApproval));
        assert!(StatusFilter::All.matches(PoStatus::Draft));
    }
}
