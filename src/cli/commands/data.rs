//! `ophub data` command - Export, import and reset the stored snapshot

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{confirm, open_store, success};
use crate::cli::GlobalOpts;
use crate::core::snapshot::export_file_name;
use crate::core::SnapshotError;

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Write the snapshot as pretty JSON
    Export(ExportArgs),

    /// Replace all data with a previously exported snapshot
    Import(ImportArgs),

    /// Discard all data and start again from the demo data
    Reset(ResetArgs),

    /// Print the path of the snapshot file
    Path,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output file; `-` for stdout (default: operations-hub-data-<date>.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Snapshot file to import
    pub path: PathBuf,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct ResetArgs {
    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: DataCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DataCommands::Export(args) => run_export(args, global),
        DataCommands::Import(args) => run_import(args, global),
        DataCommands::Reset(args) => run_reset(args, global),
        DataCommands::Path => run_path(global),
    }
}

fn run_export(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let json = store.export_snapshot().into_diagnostic()?;

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(export_file_name(Local::now().date_naive())));

    if path.as_os_str() == "-" {
        println!("{}", json);
        return Ok(());
    }

    fs::write(&path, json).into_diagnostic()?;
    success(global, format!("Exported to {}", style(path.display()).cyan()));
    Ok(())
}

fn run_import(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let serialized = fs::read_to_string(&args.path)
        .map_err(|e| miette::miette!("Cannot read {}: {}", args.path.display(), e))?;

    if !confirm("This replaces all current data. Continue?", args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut store = open_store(global);
    match store.import_snapshot(&serialized) {
        Ok(()) => {}
        Err(e @ SnapshotError::MalformedInput(_)) => {
            return Err(miette::miette!(
                help = e.to_string(),
                "Error importing data. Please check the file format."
            ));
        }
        Err(e) => return Err(e).into_diagnostic(),
    }

    let data = store.data();
    success(
        global,
        format!(
            "Imported {} ticket(s), {} asset(s), {} work order(s)",
            data.tickets.len(),
            data.assets.len(),
            data.work_orders.len()
        ),
    );
    Ok(())
}

fn run_reset(args: ResetArgs, global: &GlobalOpts) -> Result<()> {
    if !confirm("Discard all data and reload the demo data?", args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut store = open_store(global);
    store.reset_to_seed();
    success(global, "Data reset to demo data");
    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let persistence = store.persistence();
    println!("{}", persistence.storage().path_for(persistence.key()).display());
    Ok(())
}
