//! tempo order command implementation
//!
//! Loads a snapshot, runs the ordering engine against the ledger, and
//! prints the resulting work order.

use std::path::PathBuf;

use crate::cli::{resolve_day, Context};
use crate::error::Result;
use crate::order;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{Snapshot, Task};

/// Options for the order command
pub struct OrderOptions {
    pub snapshot: PathBuf,
    pub today: Option<String>,
    pub context: Context,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct OrderReport {
    today: String,
    order: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    deferred_projects: Vec<i64>,
}

pub fn run(options: OrderOptions) -> Result<()> {
    let snapshot = Snapshot::load(&options.snapshot)?;
    let today = resolve_day(options.today.as_deref())?;

    let outcome = order::order(
        &snapshot.tasks,
        &snapshot.projects,
        &options.context.ledger,
        today,
        &options.context.config.quota,
    )?;

    let report = OrderReport {
        today: today.to_string(),
        order: outcome.order.clone(),
        deferred_projects: outcome.deferred_projects.clone(),
    };

    let mut human = HumanOutput::new(format!("Work order for {today}"));
    human.push_summary("tasks", report.order.len().to_string());
    human.push_summary("deferred projects", outcome.deferred_projects.len().to_string());

    for (position, task_id) in outcome.order.iter().enumerate() {
        if let Some(task) = snapshot.task(*task_id) {
            human.push_detail(format!("{:>3}. {}", position + 1, describe(task, &snapshot)));
        }
    }

    for project_id in &outcome.deferred_projects {
        let name = snapshot
            .project(*project_id)
            .map(|project| project.name.clone())
            .unwrap_or_else(|| project_id.to_string());
        human.push_warning(format!("{name}: daily quota reached, open tasks deferred"));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "order",
        &report,
        Some(&human),
    )
}

fn describe(task: &Task, snapshot: &Snapshot) -> String {
    let project = snapshot
        .project(task.project_id)
        .map(|project| project.name.clone())
        .unwrap_or_else(|| format!("project {}", task.project_id));

    let mut line = format!("[{project}] {}", task.title);
    if task.completed {
        line.push_str(" (done)");
        return line;
    }
    if let Some(deadline) = &task.deadline {
        line.push_str(&format!(" (due {deadline})"));
    }
    if task.price > 0.0 {
        line.push_str(&format!(" ({:.2})", task.price));
    }
    line
}
