//! tempo log command implementation
//!
//! Direct upsert-add into the ledger, for backfilling work that was not
//! tracked through a task's start/complete cycle.

use crate::cli::{resolve_day, Context};
use crate::error::{Error, Result};
use crate::ledger::HoursLedger;
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for the log command
pub struct LogOptions {
    pub project: i64,
    pub day: Option<String>,
    pub hours: f64,
    pub context: Context,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct LogReport {
    project: i64,
    day: String,
    added: f64,
    total: f64,
}

pub fn run(options: LogOptions) -> Result<()> {
    if !options.hours.is_finite() {
        return Err(Error::InvalidArgument("hours must be finite".to_string()));
    }

    let day = resolve_day(options.day.as_deref())?;
    let total = options
        .context
        .ledger
        .add_hours(options.project, day, options.hours)?;

    let report = LogReport {
        project: options.project,
        day: day.to_string(),
        added: options.hours,
        total,
    };

    let mut human = HumanOutput::new(format!("Logged hours for project {}", options.project));
    human.push_summary("day", day.to_string());
    human.push_summary("added", format!("{:.2}h", options.hours));
    human.push_summary("total", format!("{total:.2}h"));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "log",
        &report,
        Some(&human),
    )
}
