//! `ophub sup` command - Supplier directory

use clap::{Subcommand, ValueEnum};
use miette::Result;

use crate::cli::helpers::{open_store, print_json, short_ref};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup;
use crate::entities::Supplier;

#[derive(Subcommand, Debug)]
pub enum SupCommands {
    /// List suppliers with filtering
    List(ListArgs),
}

/// Sort order for the supplier list
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortField {
    /// Directory order
    Added,
    Name,
    /// Highest rated first; unrated last
    Rating,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only suppliers serving this category (case-insensitive)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Search in name and email
    #[arg(long)]
    pub search: Option<String>,

    /// Sort by field
    #[arg(long, default_value = "added")]
    pub sort: SortField,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

pub fn run(cmd: SupCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SupCommands::List(args) => run_list(args, global),
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "NAME"),
    ColumnDef::new("email", "EMAIL"),
    ColumnDef::new("phone", "PHONE"),
    ColumnDef::new("categories", "CATEGORIES"),
    ColumnDef::new("rating", "RATING"),
];

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();

    let mut suppliers: Vec<(usize, &Supplier)> = data
        .suppliers
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            args.category.as_ref().map_or(true, |c| {
                s.categories.iter().any(|sc| sc.eq_ignore_ascii_case(c))
            })
        })
        .filter(|(_, s)| {
            args.search.as_ref().map_or(true, |search| {
                let search = search.to_lowercase();
                s.name.to_lowercase().contains(&search) || s.email.to_lowercase().contains(&search)
            })
        })
        .collect();

    match args.sort {
        SortField::Added => {}
        SortField::Name => suppliers.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name)),
        SortField::Rating => suppliers.sort_by(|(_, a), (_, b)| {
            b.rating
                .unwrap_or(f64::NEG_INFINITY)
                .total_cmp(&a.rating.unwrap_or(f64::NEG_INFINITY))
        }),
    }

    if let Some(limit) = args.limit {
        suppliers.truncate(limit);
    }

    if args.count {
        println!("{}", suppliers.len());
        return Ok(());
    }

    if global.format == OutputFormat::Json {
        let list: Vec<&Supplier> = suppliers.iter().map(|(_, s)| *s).collect();
        return print_json(&list);
    }

    // Short refs stay positional in the stored collection, not in the sorted view
    let rows = suppliers.iter().map(|(idx, s)| {
        TableRow::new(short_ref::<Supplier>(*idx))
            .cell("name", CellValue::Text(s.name.clone()))
            .cell("email", CellValue::Text(s.email.clone()))
            .cell("phone", CellValue::Text(s.phone.clone()))
            .cell("categories", CellValue::Text(s.categories.join(", ")))
            .cell(
                "rating",
                CellValue::Text(lookup::or_na(s.rating.map(|r| format!("{:.1}", r)))),
            )
    });

    TableFormatter::new(COLUMNS, "supplier", "SUP")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}
