//! The task ordering engine.
//!
//! Pure function from a store snapshot, a ledger handle, and "today" to
//! the single sequence the user should work through. Re-run on every
//! listing; no side effects, deterministic for a given input.
//!
//! The shape of the result:
//!
//! 1. Open tasks of subscription projects, grouped per project. A
//!    project at or over the daily hours cap is deferred entirely for
//!    this pass; the rest are served in ascending order of hours already
//!    worked today, so the least-served client comes first.
//! 2. Open tasks of regular projects.
//! 3. Completed tasks, oldest first.
//!
//! Within any one bucket, tasks run oldest-to-newest by creation date.
//! Price breaks ties between same-day tasks, highest first, but only
//! when the deadline leaves enough headroom: an imminent deadline
//! suppresses price reordering and lets arrival order stand.
//!
//! Malformed dates never fail the listing; they degrade locally (an
//! unparseable creation date sorts as today, an unparseable deadline as
//! absent). Only ledger read failures propagate.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::config::QuotaConfig;
use crate::dates;
use crate::error::Result;
use crate::ledger::HoursLedger;
use crate::task::{Project, ProjectId, Task, TaskId};

/// Result of one ordering pass
#[derive(Debug, Clone, Serialize)]
pub struct OrderOutcome {
    /// Task ids in display/work order
    pub order: Vec<TaskId>,
    /// Subscription projects deferred because today's hours reached the
    /// cap; their open tasks are absent from `order` for this pass
    pub deferred_projects: Vec<ProjectId>,
}

/// Compute the work order for a snapshot.
///
/// `today` scopes the quota: the ledger is keyed by calendar day, so a
/// new day naturally starts every project back at zero hours without
/// any reset step.
pub fn order(
    tasks: &[Task],
    projects: &[Project],
    ledger: &dyn HoursLedger,
    today: NaiveDate,
    rules: &QuotaConfig,
) -> Result<OrderOutcome> {
    let by_id: HashMap<ProjectId, &Project> =
        projects.iter().map(|project| (project.id, project)).collect();

    let (open, completed): (Vec<&Task>, Vec<&Task>) =
        tasks.iter().partition(|task| !task.completed);

    // A task whose project is unknown gets no subscription treatment;
    // it rides with the regular bucket.
    let (subscription, regular): (Vec<&Task>, Vec<&Task>) = open.into_iter().partition(|task| {
        by_id
            .get(&task.project_id)
            .map(|project| project.is_subscription)
            .unwrap_or(false)
    });

    let (mut ordered, deferred_projects) =
        order_subscription(subscription, ledger, today, rules)?;
    ordered.extend(sort_by_priority(regular, today, rules));
    ordered.extend(sort_completed(completed));

    Ok(OrderOutcome {
        order: ordered.into_iter().map(|task| task.id).collect(),
        deferred_projects,
    })
}

/// Order subscription tasks under the daily quota.
///
/// Groups by project in first-appearance order, drops projects at or
/// over the cap, and serves the remainder ascending by hours worked
/// today. The stable sort keeps equal-hours projects in appearance
/// order, so ties are arbitrary but reproducible.
fn order_subscription<'a>(
    tasks: Vec<&'a Task>,
    ledger: &dyn HoursLedger,
    today: NaiveDate,
    rules: &QuotaConfig,
) -> Result<(Vec<&'a Task>, Vec<ProjectId>)> {
    let mut groups: Vec<(ProjectId, Vec<&Task>)> = Vec::new();
    let mut index: HashMap<ProjectId, usize> = HashMap::new();
    for task in tasks {
        match index.get(&task.project_id) {
            Some(&slot) => groups[slot].1.push(task),
            None => {
                index.insert(task.project_id, groups.len());
                groups.push((task.project_id, vec![task]));
            }
        }
    }

    let mut served: Vec<(f64, ProjectId, Vec<&Task>)> = Vec::new();
    let mut deferred: Vec<ProjectId> = Vec::new();
    for (project_id, group) in groups {
        let hours_worked = ledger.hours(project_id, today)?;
        if hours_worked >= rules.daily_hours_cap {
            deferred.push(project_id);
            continue;
        }
        served.push((hours_worked, project_id, group));
    }

    served.sort_by(|left, right| left.0.total_cmp(&right.0));
    deferred.sort_unstable();

    let mut ordered = Vec::new();
    for (_, _, group) in served {
        ordered.extend(sort_by_priority(group, today, rules));
    }
    Ok((ordered, deferred))
}

/// The shared task-priority order: creation date ascending, with price
/// (highest first) breaking same-day ties when the deadline allows.
fn sort_by_priority<'a>(
    tasks: Vec<&'a Task>,
    today: NaiveDate,
    rules: &QuotaConfig,
) -> Vec<&'a Task> {
    let mut keyed: Vec<((NaiveDate, f64), &Task)> = tasks
        .into_iter()
        .map(|task| (priority_key(task, today, rules), task))
        .collect();
    // Stable: tasks with identical keys keep their snapshot order.
    // partial_cmp treats -0.0 and 0.0 as equal, so a zero-price task
    // whose deadline allows price sorting stays put next to ineligible
    // same-day siblings. Prices come from JSON and cannot be NaN.
    keyed.sort_by(|(left, _), (right, _)| {
        left.0
            .cmp(&right.0)
            .then_with(|| left.1.partial_cmp(&right.1).unwrap_or(Ordering::Equal))
    });
    keyed.into_iter().map(|(_, task)| task).collect()
}

/// Sort key for one task.
///
/// The second component is `-price` when price sorting is allowed and a
/// constant `0` otherwise, so ineligible tasks neither gain nor lose
/// ground against each other.
fn priority_key(task: &Task, today: NaiveDate, rules: &QuotaConfig) -> (NaiveDate, f64) {
    let created = match dates::parse_day(&task.created_at) {
        Some(day) => day,
        None => {
            warn!(
                task_id = task.id,
                created_at = %task.created_at,
                "unparseable creation date, sorting as today"
            );
            today
        }
    };

    let price_component = if can_price_sort(task, today, rules) {
        -task.price
    } else {
        0.0
    };

    (created, price_component)
}

/// Price may reorder same-day tasks only when the deadline is more than
/// the configured lead window away. No deadline, or one that cannot be
/// parsed, also disallows it.
fn can_price_sort(task: &Task, today: NaiveDate, rules: &QuotaConfig) -> bool {
    let Some(deadline) = task.deadline.as_deref().and_then(dates::parse_day) else {
        return false;
    };
    deadline.signed_duration_since(today).num_days() > rules.price_sort_lead_days
}

/// Completed tasks trail the list, oldest creation first.
///
/// Sorted on the stored timestamp text (uniform ISO text orders
/// chronologically), with the id as a deterministic tiebreak.
fn sort_completed(mut tasks: Vec<&Task>) -> Vec<&Task> {
    tasks.sort_by(|left, right| {
        left.created_at
            .cmp(&right.created_at)
            .then_with(|| left.id.cmp(&right.id))
    });
    tasks
}
