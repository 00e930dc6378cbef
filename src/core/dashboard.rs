//! Dashboard KPIs computed from the live aggregate

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::sla::{sla_status, SlaStatus};
use crate::entities::{AppData, AssetStatus, PoStatus, TicketStatus};

/// Window for "PM due soon", in days from today
pub const PM_DUE_WINDOW_DAYS: i64 = 7;

/// Headline numbers for the status view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Tickets that are `open` or `in_progress`
    pub open_tickets: usize,
    pub overdue_tickets: usize,
    pub pending_approvals: usize,
    /// Active or not, any plan whose next due date falls within the window
    pub upcoming_pm: usize,
    /// Total of approved, sent and received POs
    pub committed_spend: f64,
    pub total_assets: usize,
    pub operational_assets: usize,
    pub maintenance_assets: usize,
    pub suppliers: usize,
}

impl DashboardStats {
    pub fn compute(data: &AppData, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();

        let open_tickets = data
            .tickets
            .iter()
            .filter(|t| matches!(t.status, TicketStatus::Open | TicketStatus::InProgress))
            .count();

        let overdue_tickets = data
            .tickets
            .iter()
            .filter(|t| sla_status(t.sla_deadline, &t.status, now) == SlaStatus::Overdue)
            .count();

        let pending_approvals = data
            .pos
            .iter()
            .filter(|p| p.status == PoStatus::PendingApproval)
            .count();

        let upcoming_pm = data
            .pm_plans
            .iter()
            .filter_map(|p| p.next_due)
            .filter(|due| (0..=PM_DUE_WINDOW_DAYS).contains(&(*due - today).num_days()))
            .count();

        let committed_spend = data
            .pos
            .iter()
            .filter(|p| p.status.is_committed())
            .map(|p| p.total)
            .sum();

        let assets_in = |status: AssetStatus| data.assets.iter().filter(|a| a.status == status).count();

        Self {
            open_tickets,
            overdue_tickets,
            pending_approvals,
            upcoming_pm,
            committed_spend,
            total_assets: data.assets.len(),
            operational_assets: assets_in(AssetStatus::Operational),
            maintenance_assets: assets_in(AssetStatus::Maintenance),
            suppliers: data.suppliers.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed::demo_data;
    use chrono::{Days, Duration};

    #[test]
    fn test_counts_match_seed() {
        let now = Utc::now();
        let data = demo_data(now);
        let stats = DashboardStats::compute(&data, now);

        assert_eq!(stats.total_assets, data.assets.len());
        assert_eq!(stats.suppliers, data.suppliers.len());
        assert!(stats.operational_assets + stats.maintenance_assets <= stats.total_assets);
        let expected_spend: f64 = data
            .pos
            .iter()
            .filter(|p| p.status.is_committed())
            .map(|p| p.total)
            .sum();
        assert_eq!(stats.committed_spend, expected_spend);
    }

    #[test]
    fn test_overdue_and_open() {
        let now = Utc::now();
        let mut data = demo_data(now);
        for t in &mut data.tickets {
            t.status = TicketStatus::Open;
            t.sla_deadline = Some(now - Duration::minutes(1));
        }
        data.tickets[0].status = TicketStatus::Closed;

        let stats = DashboardStats::compute(&data, now);
        assert_eq!(stats.open_tickets, data.tickets.len() - 1);
        assert_eq!(stats.overdue_tickets, data.tickets.len() - 1);
    }

    #[test]
    fn test_pm_window_is_inclusive_and_excludes_past() {
        let now = Utc::now();
        let today = now.date_naive();
        let mut data = demo_data(now);
        data.pm_plans.truncate(1);
        let plan = data.pm_plans[0].clone();

        let due_in = |days: u64| {
            let mut p = plan.clone();
            p.next_due = today.checked_add_days(Days::new(days));
            p
        };
        let mut overdue = plan.clone();
        overdue.next_due = today.checked_sub_days(Days::new(1));
        let mut unscheduled = plan.clone();
        unscheduled.next_due = None;

        data.pm_plans = vec![due_in(0), due_in(7), due_in(8), overdue, unscheduled];
        assert_eq!(DashboardStats::compute(&data, now).upcoming_pm, 2);
    }
}
