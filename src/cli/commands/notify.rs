//! `ophub notify` command - Notifications for the current user

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{
    acting_user, format_short_id, open_store, print_json, resolve, short_ref, success,
};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup;
use crate::entities::Notification;

#[derive(Subcommand, Debug)]
pub enum NotifyCommands {
    /// List the current user's notifications
    List(ListArgs),

    /// Mark one notification read
    Read(ReadArgs),

    /// Mark every notification read
    ReadAll,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only unread notifications
    #[arg(long, short = 'u')]
    pub unread: bool,
}

#[derive(clap::Args, Debug)]
pub struct ReadArgs {
    /// Notification ID or short ID (NTF@N)
    pub id: String,
}

pub fn run(cmd: NotifyCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        NotifyCommands::List(args) => run_list(args, global),
        NotifyCommands::Read(args) => run_read(args, global),
        NotifyCommands::ReadAll => run_read_all(global),
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("type", "TYPE"),
    ColumnDef::new("title", "TITLE"),
    ColumnDef::new("message", "MESSAGE"),
    ColumnDef::new("read", "READ"),
    ColumnDef::new("created", "CREATED"),
];

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let user = acting_user(&store)?;
    let data = store.data();

    // Newest first, keeping each notification's position in the full collection
    let mut mine: Vec<(usize, &Notification)> = data
        .notifications
        .iter()
        .enumerate()
        .filter(|(_, n)| n.user_id == user)
        .filter(|(_, n)| !args.unread || !n.read)
        .collect();
    mine.sort_by(|(_, a), (_, b)| b.created_at.cmp(&a.created_at));

    if global.format == OutputFormat::Json {
        let list: Vec<&Notification> = mine.iter().map(|(_, n)| *n).collect();
        return print_json(&list);
    }

    let rows = mine.iter().map(|(idx, n)| {
        TableRow::new(short_ref::<Notification>(*idx))
            .cell("type", CellValue::Text(n.kind.to_string()))
            .cell("title", CellValue::Text(n.title.clone()))
            .cell("message", CellValue::Text(n.message.clone()))
            .cell(
                "read",
                CellValue::Text(if n.read { "yes" } else { "no" }.to_string()),
            )
            .cell("created", CellValue::DateTime(n.created_at))
    });

    TableFormatter::new(COLUMNS, "notification", "NTF")
        .quiet(global.quiet)
        .output(rows, global.format);

    if global.format == OutputFormat::Auto && !global.quiet {
        println!(
            "{} unread",
            style(lookup::unread_count(&data.notifications, &user)).yellow()
        );
    }
    Ok(())
}

fn run_read(args: ReadArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let id = resolve(store.notifications(), &args.id)?.id.clone();

    store.mark_notification_read(&id);
    success(global, format!("Marked {} read", format_short_id(&id)));
    Ok(())
}

fn run_read_all(global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let unread = store.notifications().iter().filter(|n| !n.read).count();

    store.mark_all_notifications_read();
    success(global, format!("Marked {} notification(s) read", unread));
    Ok(())
}
