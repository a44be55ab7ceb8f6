//! tempo complete command implementation
//!
//! Drives the accrual updater for one completion event. The task's
//! pre-update start time comes from the snapshot; the completion time
//! is supplied or taken as now. The snapshot file is left untouched.

use std::path::PathBuf;

use crate::accrual::{record_completion, Accrual};
use crate::cli::Context;
use crate::dates;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::Snapshot;

/// Options for the complete command
pub struct CompleteOptions {
    pub snapshot: PathBuf,
    pub task: i64,
    pub at: Option<String>,
    pub context: Context,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct CompleteReport {
    task: i64,
    completed_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    accrual: Option<Accrual>,
}

pub fn run(options: CompleteOptions) -> Result<()> {
    let snapshot = Snapshot::load(&options.snapshot)?;
    let task = snapshot
        .task(options.task)
        .ok_or(Error::TaskNotFound(options.task))?;
    let project = snapshot
        .project(task.project_id)
        .ok_or(Error::ProjectNotFound(task.project_id))?;

    let completed_at = match &options.at {
        Some(raw) => {
            if dates::parse_timestamp(raw).is_none() {
                return Err(Error::InvalidArgument(format!(
                    "unparseable completion time: {raw}"
                )));
            }
            raw.clone()
        }
        None => chrono::Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
    };

    if let (Some(started), Some(completed)) = (
        task.started_at.as_deref().and_then(dates::parse_timestamp),
        dates::parse_timestamp(&completed_at),
    ) {
        if completed < started {
            return Err(Error::InvalidArgument(format!(
                "completion time {completed_at} precedes start time"
            )));
        }
    }

    let accrual = record_completion(
        &options.context.ledger,
        project,
        task.started_at.as_deref(),
        &completed_at,
    )?;

    let mut human = HumanOutput::new(format!("Completed: {}", task.title));
    human.push_summary("task", task.id.to_string());
    human.push_summary("project", project.name.clone());
    match &accrual {
        Some(accrual) => {
            human.push_summary("accrued", format!("{:.2}h", accrual.hours));
            human.push_summary(
                "day total",
                format!("{:.2}h on {}", accrual.total_hours, accrual.work_date),
            );
        }
        None => {
            human.push_warning(
                "nothing accrued (non-subscription project, or no recorded start time)",
            );
        }
    }

    let report = CompleteReport {
        task: task.id,
        completed_at,
        accrual,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "complete",
        &report,
        Some(&human),
    )
}
