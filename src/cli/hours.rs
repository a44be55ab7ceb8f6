//! tempo hours command implementation
//!
//! Reads a project's accumulated hours for one day straight from the
//! ledger. An untouched key reads as zero.

use crate::cli::{resolve_day, Context};
use crate::error::Result;
use crate::ledger::HoursLedger;
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for the hours command
pub struct HoursOptions {
    pub project: i64,
    pub day: Option<String>,
    pub context: Context,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct HoursReport {
    project: i64,
    day: String,
    hours: f64,
    cap: f64,
    at_quota: bool,
}

pub fn run(options: HoursOptions) -> Result<()> {
    let day = resolve_day(options.day.as_deref())?;
    let hours = options.context.ledger.hours(options.project, day)?;
    let cap = options.context.config.quota.daily_hours_cap;

    let report = HoursReport {
        project: options.project,
        day: day.to_string(),
        hours,
        cap,
        at_quota: hours >= cap,
    };

    let mut human = HumanOutput::new(format!("Hours for project {} on {day}", options.project));
    human.push_summary("worked", format!("{hours:.2}h"));
    human.push_summary("cap", format!("{cap:.2}h"));
    if report.at_quota {
        human.push_warning("daily quota reached; open tasks defer until tomorrow");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "hours",
        &report,
        Some(&human),
    )
}
