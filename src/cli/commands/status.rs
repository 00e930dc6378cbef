//! `ophub status` command - Operations dashboard

use chrono::Utc;
use console::style;
use miette::Result;

use crate::cli::helpers::{open_store, print_json, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lookup;
use crate::core::sla::sla_status;
use crate::core::DashboardStats;

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// How many recent tickets and work orders to list
    #[arg(long, default_value_t = 5)]
    pub recent: usize,
}

pub fn run(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global);
    let data = store.data();
    let now = Utc::now();
    let stats = DashboardStats::compute(data, now);

    match global.format {
        OutputFormat::Json => print_json(&stats)?,
        OutputFormat::Tsv => {
            println!("open_tickets\t{}", stats.open_tickets);
            println!("overdue_tickets\t{}", stats.overdue_tickets);
            println!("pending_approvals\t{}", stats.pending_approvals);
            println!("upcoming_pm\t{}", stats.upcoming_pm);
            println!("committed_spend\t{:.2}", stats.committed_spend);
            println!("total_assets\t{}", stats.total_assets);
            println!("operational_assets\t{}", stats.operational_assets);
            println!("maintenance_assets\t{}", stats.maintenance_assets);
            println!("suppliers\t{}", stats.suppliers);
        }
        OutputFormat::Auto => {
            let width = 60;
            let who = store.current_user().map_or(lookup::UNKNOWN, |u| u.name.as_str());

            println!("{}", style("Operations Hub").bold().underlined());
            println!("{}", style(format!("Signed in as {}", who)).dim());
            println!("{}", "═".repeat(width));

            let overdue = if stats.overdue_tickets > 0 {
                style(stats.overdue_tickets).red().bold()
            } else {
                style(stats.overdue_tickets).green()
            };
            println!("{:<28} {}", "Open tickets", style(stats.open_tickets).cyan());
            println!("{:<28} {}", "SLA overdue", overdue);
            println!(
                "{:<28} {}",
                "Pending PO approvals",
                style(stats.pending_approvals).yellow()
            );
            println!("{:<28} {}", "PM due within 7 days", stats.upcoming_pm);
            println!(
                "{:<28} {}",
                "Committed spend",
                style(format!("${:.2}", stats.committed_spend)).cyan()
            );
            println!(
                "{:<28} {} ({} operational, {} in maintenance)",
                "Assets",
                stats.total_assets,
                style(stats.operational_assets).green(),
                style(stats.maintenance_assets).magenta()
            );
            println!("{:<28} {}", "Suppliers", stats.suppliers);

            if args.recent > 0 {
                println!();
                println!("{}", style("Recent tickets").bold());
                for t in data.tickets.iter().rev().take(args.recent) {
                    println!(
                        "  {:<32} {:<12} {:<9} {}",
                        truncate_str(&t.title, 30),
                        t.status.to_string(),
                        t.priority.to_string(),
                        sla_status(t.sla_deadline, &t.status, now)
                    );
                }

                println!();
                println!("{}", style("Recent work orders").bold());
                for wo in data.work_orders.iter().rev().take(args.recent) {
                    println!(
                        "  {:<32} {:<12} {}",
                        truncate_str(&wo.title, 30),
                        wo.status.to_string(),
                        lookup::assignee_name(data, wo.assignee_id.as_ref())
                    );
                }
            }
        }
    }

    Ok(())
}
