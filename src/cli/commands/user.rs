//! `ophub user` command - Users and the acting identity

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{open_store, print_json, resolve, short_ref, success};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup;
use crate::entities::User;

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List users; the current user is marked
    List,

    /// Act as another user
    Switch(SwitchArgs),
}

#[derive(clap::Args, Debug)]
pub struct SwitchArgs {
    /// User ID or short ID (USR@N)
    pub id: String,
}

pub fn run(cmd: UserCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        UserCommands::List => run_list(global),
        UserCommands::Switch(args) => run_switch(args, global),
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("current", ""),
    ColumnDef::new("name", "NAME"),
    ColumnDef::new("email", "EMAIL"),
    ColumnDef::new("role", "ROLE"),
    ColumnDef::new("site", "SITE"),
];

fn run_list(global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();

    if global.format == OutputFormat::Json {
        return print_json(&data.users);
    }

    let current = data.current_user_id.as_ref();
    let rows = data.users.iter().enumerate().map(|(idx, u)| {
        let site = u
            .site_id
            .as_ref()
            .map_or(lookup::NOT_AVAILABLE, |id| lookup::site_name(data, id));
        TableRow::new(short_ref::<User>(idx))
            .cell(
                "current",
                CellValue::Text(if current == Some(&u.id) { "*" } else { "" }.to_string()),
            )
            .cell("name", CellValue::Text(u.name.clone()))
            .cell("email", CellValue::Text(u.email.clone()))
            .cell("role", CellValue::Text(u.role.to_string()))
            .cell("site", CellValue::Text(site.to_string()))
    });

    TableFormatter::new(COLUMNS, "user", "USR")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}

fn run_switch(args: SwitchArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global);
    let (id, name) = {
        let u = resolve(store.users(), &args.id)?;
        (u.id.clone(), u.name.clone())
    };

    store.set_current_user(id);
    success(global, format!("Now acting as {}", style(name).cyan()));
    Ok(())
}
