//! Completion accrual: fold finished work into the daily ledger.
//!
//! Invoked once per completion event, before or alongside the caller
//! persisting the task's new state. This is best-effort enrichment of
//! the ledger, not a correctness-critical path: anything that cannot be
//! attributed (non-subscription project, no recorded start, unparseable
//! timestamps) is skipped silently.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::dates;
use crate::error::Result;
use crate::ledger::HoursLedger;
use crate::task::{Project, ProjectId};

/// What a completion added to the ledger
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Accrual {
    pub project_id: ProjectId,
    /// Calendar day of `completed_at` — work that spans midnight is
    /// booked entirely on the day it finished
    pub work_date: NaiveDate,
    /// Duration added, in fractional hours
    pub hours: f64,
    /// Project's ledger total for that day after the add
    pub total_hours: f64,
}

/// Record a task completion against the owning project's daily ledger.
///
/// `started_at` is the task's pre-update start timestamp and
/// `completed_at` the completion timestamp being persisted. Returns
/// `Ok(None)` when nothing was accrued.
///
/// Precondition: the caller has already rejected completions earlier
/// than the start. The duration is not clamped here, so a violated
/// ordering accrues negative hours.
///
/// Only ledger storage failures propagate.
pub fn record_completion(
    ledger: &dyn HoursLedger,
    project: &Project,
    started_at: Option<&str>,
    completed_at: &str,
) -> Result<Option<Accrual>> {
    if !project.is_subscription {
        return Ok(None);
    }

    let Some(started_raw) = started_at else {
        debug!(project_id = project.id, "completion without start, no accrual");
        return Ok(None);
    };

    let (Some(started), Some(completed)) = (
        dates::parse_timestamp(started_raw),
        dates::parse_timestamp(completed_at),
    ) else {
        debug!(
            project_id = project.id,
            started_at = started_raw,
            completed_at,
            "unparseable completion timestamps, no accrual"
        );
        return Ok(None);
    };

    let hours = dates::hours_between(started, completed);
    let work_date = completed.date_naive();
    let total_hours = ledger.add_hours(project.id, work_date, hours)?;

    Ok(Some(Accrual {
        project_id: project.id,
        work_date,
        hours,
        total_hours,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    fn subscription(id: ProjectId) -> Project {
        Project {
            id,
            name: format!("client-{id}"),
            is_subscription: true,
        }
    }

    #[test]
    fn ninety_minutes_accrues_one_and_a_half_hours() {
        let ledger = MemoryLedger::new();
        let accrual = record_completion(
            &ledger,
            &subscription(4),
            Some("2024-03-04T10:00:00Z"),
            "2024-03-04T11:30:00Z",
        )
        .unwrap()
        .expect("accrual recorded");

        assert_eq!(accrual.project_id, 4);
        assert!((accrual.hours - 1.5).abs() < 1e-9);
        assert!((accrual.total_hours - 1.5).abs() < 1e-9);
        assert_eq!(
            accrual.work_date,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn non_subscription_project_is_skipped() {
        let ledger = MemoryLedger::new();
        let project = Project {
            id: 9,
            name: "one-off".to_string(),
            is_subscription: false,
        };

        let accrual = record_completion(
            &ledger,
            &project,
            Some("2024-03-04T10:00:00Z"),
            "2024-03-04T12:00:00Z",
        )
        .unwrap();
        assert!(accrual.is_none());
        assert_eq!(
            ledger
                .hours(9, chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
                .unwrap(),
            0.0
        );
    }

    #[test]
    fn missing_start_is_skipped() {
        let ledger = MemoryLedger::new();
        let accrual =
            record_completion(&ledger, &subscription(4), None, "2024-03-04T12:00:00Z").unwrap();
        assert!(accrual.is_none());
    }

    #[test]
    fn unparseable_timestamps_are_skipped() {
        let ledger = MemoryLedger::new();
        let accrual = record_completion(
            &ledger,
            &subscription(4),
            Some("whenever"),
            "2024-03-04T12:00:00Z",
        )
        .unwrap();
        assert!(accrual.is_none());

        let accrual =
            record_completion(&ledger, &subscription(4), Some("2024-03-04T10:00:00Z"), "???")
                .unwrap();
        assert!(accrual.is_none());
    }

    #[test]
    fn midnight_spanning_work_books_on_completion_day() {
        let ledger = MemoryLedger::new();
        let accrual = record_completion(
            &ledger,
            &subscription(4),
            Some("2024-03-04T23:00:00Z"),
            "2024-03-05T01:00:00Z",
        )
        .unwrap()
        .expect("accrual recorded");

        assert_eq!(
            accrual.work_date,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert!((accrual.hours - 2.0).abs() < 1e-9);
    }
}
