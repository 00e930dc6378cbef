//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    asset::AssetCommands, completions::CompletionsArgs, data::DataCommands,
    notify::NotifyCommands, po::PoCommands, pm::PmCommands, rfq::RfqCommands,
    status::StatusArgs, sup::SupCommands, ticket::TicketCommands, user::UserCommands,
    wo::WoCommands,
};

#[derive(Parser)]
#[command(name = "ophub")]
#[command(author, version, about = "Operations Hub")]
#[command(long_about = "A local-first operations store for service tickets, assets, maintenance and procurement. All data lives in a single versioned JSON snapshot.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Directory holding the data snapshot (default: platform data dir)
    #[arg(long, global = true, env = "OPHUB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show dashboard KPIs
    Status(StatusArgs),

    /// Service desk tickets
    #[command(subcommand)]
    Ticket(TicketCommands),

    /// Asset register
    #[command(subcommand)]
    Asset(AssetCommands),

    /// Work orders
    #[command(subcommand)]
    Wo(WoCommands),

    /// Preventive maintenance plans
    #[command(subcommand)]
    Pm(PmCommands),

    /// Suppliers
    #[command(subcommand)]
    Sup(SupCommands),

    /// Requests for quotation
    #[command(subcommand)]
    Rfq(RfqCommands),

    /// Purchase orders
    #[command(subcommand)]
    Po(PoCommands),

    /// Notifications for the current user
    #[command(subcommand)]
    Notify(NotifyCommands),

    /// Users and the active session user
    #[command(subcommand)]
    User(UserCommands),

    /// Export, import and reset the data snapshot
    #[command(subcommand)]
    Data(DataCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for lists, labelled fields for single records
    #[default]
    Auto,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
}
