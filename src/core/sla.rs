//! SLA rules: deadline assignment at ticket creation and status classification
//!
//! Classification depends on the wall clock, so it is computed on every read
//! and never stored.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::core::entity::Priority;
use crate::entities::{AppSettings, TicketStatus, WorkOrderStatus};

/// Time before the deadline at which a ticket is flagged
pub const WARNING_WINDOW_HOURS: i64 = 2;

/// SLA standing of a ticket or work order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlaStatus {
    Ok,
    Warning,
    Overdue,
}

impl std::fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlaStatus::Ok => write!(f, "ok"),
            SlaStatus::Warning => write!(f, "warning"),
            SlaStatus::Overdue => write!(f, "overdue"),
        }
    }
}

/// Anything with a status that may end the SLA clock
pub trait SlaSubject {
    fn is_terminal(&self) -> bool;
}

impl SlaSubject for TicketStatus {
    fn is_terminal(&self) -> bool {
        TicketStatus::is_terminal(self)
    }
}

impl SlaSubject for WorkOrderStatus {
    /// Only completion stops the clock; cancelled work still shows as late
    fn is_terminal(&self) -> bool {
        matches!(self, WorkOrderStatus::Completed)
    }
}

/// Resolution deadline for a ticket created at `now` with `priority`.
///
/// `None` when SLAs are disabled or no policy covers the priority.
pub fn sla_deadline_for(
    settings: &AppSettings,
    priority: Priority,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if !settings.sla_enabled {
        return None;
    }
    settings
        .policy_for(priority)
        .map(|p| now + Duration::minutes(p.resolution_minutes))
}

/// Classify a deadline against `now`.
///
/// Terminal statuses and missing deadlines are always `Ok`. Past the deadline
/// is `Overdue`; strictly less than two hours remaining is `Warning`.
pub fn sla_status<S: SlaSubject>(
    deadline: Option<DateTime<Utc>>,
    status: &S,
    now: DateTime<Utc>,
) -> SlaStatus {
    let Some(deadline) = deadline else {
        return SlaStatus::Ok;
    };
    if status.is_terminal() {
        return SlaStatus::Ok;
    }

    let remaining = deadline - now;
    if remaining < Duration::zero() {
        SlaStatus::Overdue
    } else if remaining < Duration::hours(WARNING_WINDOW_HOURS) {
        SlaStatus::Warning
    } else {
        SlaStatus::Ok
    }
}

/// [`sla_status`] against the current time
pub fn sla_status_now<S: SlaSubject>(deadline: Option<DateTime<Utc>>, status: &S) -> SlaStatus {
    sla_status(deadline, status, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(now: DateTime<Utc>, offset: Duration) -> Option<DateTime<Utc>> {
        Some(now + offset)
    }

    #[test]
    fn test_no_deadline_is_ok() {
        assert_eq!(sla_status(None, &TicketStatus::Open, Utc::now()), SlaStatus::Ok);
    }

    #[test]
    fn test_terminal_status_is_ok_even_when_overdue() {
        let now = Utc::now();
        let past = at(now, Duration::hours(-5));
        assert_eq!(sla_status(past, &TicketStatus::Closed, now), SlaStatus::Ok);
        assert_eq!(sla_status(past, &TicketStatus::Resolved, now), SlaStatus::Ok);
        assert_eq!(sla_status(past, &WorkOrderStatus::Completed, now), SlaStatus::Ok);
    }

    #[test]
    fn test_overdue_one_second_past() {
        let now = Utc::now();
        let deadline = at(now, Duration::seconds(-1));
        assert_eq!(sla_status(deadline, &TicketStatus::Open, now), SlaStatus::Overdue);
    }

    #[test]
    fn test_warning_window_boundaries() {
        let now = Utc::now();
        let inside = at(now, Duration::hours(1) + Duration::minutes(59));
        assert_eq!(sla_status(inside, &TicketStatus::Open, now), SlaStatus::Warning);

        let just_inside = at(now, Duration::hours(2) - Duration::seconds(1));
        assert_eq!(sla_status(just_inside, &TicketStatus::InProgress, now), SlaStatus::Warning);

        // The deadline instant itself has zero time left, which is not yet overdue
        assert_eq!(sla_status(Some(now), &TicketStatus::Open, now), SlaStatus::Warning);
    }

    #[test]
    fn test_outside_warning_window_is_ok() {
        let now = Utc::now();
        assert_eq!(
            sla_status(at(now, Duration::hours(2)), &TicketStatus::Open, now),
            SlaStatus::Ok
        );
        // Only strictly less than two hours left counts as a warning
        assert_eq!(
            sla_status(at(now, Duration::hours(2) + Duration::seconds(1)), &TicketStatus::Open, now),
            SlaStatus::Ok
        );
    }

    #[test]
    fn test_deadline_uses_resolution_minutes() {
        let settings = AppSettings::default();
        let now = Utc::now();
        let policy = settings.policy_for(Priority::Critical).unwrap().clone();
        assert_eq!(
            sla_deadline_for(&settings, Priority::Critical, now),
            Some(now + Duration::minutes(policy.resolution_minutes))
        );
    }

    #[test]
    fn test_deadline_absent_when_disabled_or_no_policy() {
        let now = Utc::now();
        let mut settings = AppSettings::default();
        settings.sla_enabled = false;
        assert!(sla_deadline_for(&settings, Priority::High, now).is_none());

        let mut settings = AppSettings::default();
        settings.sla_policies.retain(|p| p.priority != Priority::Low);
        assert!(sla_deadline_for(&settings, Priority::Low, now).is_none());
    }
}
