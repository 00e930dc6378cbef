//! `ophub rfq` command - Requests for quotation

use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::{open_store, print_json, short_ref};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup;
use crate::entities::{AppData, Quote, Rfq, RfqStatus};

#[derive(Subcommand, Debug)]
pub enum RfqCommands {
    /// List RFQs with their quote counts
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Hide awarded and cancelled RFQs
    #[arg(long)]
    pub open: bool,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

pub fn run(cmd: RfqCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RfqCommands::List(args) => run_list(args, global),
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("title", "TITLE"),
    ColumnDef::new("status", "STATUS"),
    ColumnDef::new("site", "SITE"),
    ColumnDef::new("suppliers", "SUPPLIERS"),
    ColumnDef::new("quotes", "QUOTES"),
    ColumnDef::new("awarded", "AWARDED"),
    ColumnDef::new("due", "DUE"),
];

fn awarded_cell(data: &AppData, rfq: &Rfq) -> CellValue {
    let Some(ref quote_id) = rfq.awarded_quote_id else {
        return CellValue::Empty;
    };
    if !lookup::awarded_quote_is_consistent(data, rfq) {
        return CellValue::Text("! quote mismatch".to_string());
    }
    let supplier = lookup::find::<Quote>(&data.quotes, quote_id)
        .map_or(lookup::UNKNOWN, |q| lookup::supplier_name(data, &q.supplier_id));
    CellValue::Text(supplier.to_string())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();

    let rfqs: Vec<(usize, &Rfq)> = data
        .rfqs
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            !args.open || !matches!(r.status, RfqStatus::Awarded | RfqStatus::Cancelled)
        })
        .collect();

    if args.count {
        println!("{}", rfqs.len());
        return Ok(());
    }

    if global.format == OutputFormat::Json {
        let list: Vec<&Rfq> = rfqs.iter().map(|(_, r)| *r).collect();
        return print_json(&list);
    }

    let rows = rfqs.iter().map(|(idx, r)| {
        let quotes = data.quotes.iter().filter(|q| q.rfq_id == r.id).count();
        TableRow::new(short_ref::<Rfq>(*idx))
            .cell("title", CellValue::Text(r.title.clone()))
            .cell("status", CellValue::Status(r.status.to_string()))
            .cell("site", CellValue::Text(lookup::site_name(data, &r.site_id).to_string()))
            .cell("suppliers", CellValue::Number(r.supplier_ids.len() as i64))
            .cell("quotes", CellValue::Number(quotes as i64))
            .cell("awarded", awarded_cell(data, r))
            .cell("due", CellValue::Date(r.due_date))
    });

    TableFormatter::new(COLUMNS, "RFQ", "RFQ")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}
