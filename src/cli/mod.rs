//! Command-line interface for tempo
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.
//!
//! The CLI is a thin driver over the engine: it stands in for the
//! record-store-backed web layer, feeding the engine a JSON snapshot
//! file and a file-backed ledger.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::ledger::FileLedger;

mod complete;
mod hours;
mod log;
mod order;

/// tempo - task prioritization under subscription quotas
///
/// Computes the one order to work tasks in: least-served subscription
/// clients first (capped per day), then regular work, oldest first,
/// with completed tasks trailing.
#[derive(Parser, Debug)]
#[command(name = "tempo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding .tempo.toml and the default ledger file
    /// (defaults to the current directory)
    #[arg(long, global = true, env = "TEMPO_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Path to the daily-hours ledger file (overrides configuration)
    #[arg(long, global = true, env = "TEMPO_LEDGER")]
    pub ledger: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the work order for a snapshot of tasks and projects
    Order {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        /// Override "today" (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        today: Option<String>,
    },

    /// Record a task completion against the subscription ledger
    ///
    /// Uses the task's recorded start time and the given (or current)
    /// completion time. The snapshot itself is not modified; persisting
    /// the task's new state is the record store's job.
    Complete {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        /// Id of the task being completed
        #[arg(long)]
        task: i64,

        /// Completion timestamp; defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Read accumulated hours for a project on a day
    Hours {
        /// Project id
        #[arg(long)]
        project: i64,

        /// Day to read (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        day: Option<String>,
    },

    /// Add hours directly to a project's daily ledger entry
    Log {
        /// Project id
        #[arg(long)]
        project: i64,

        /// Day to book against (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        day: Option<String>,

        /// Hours to add (fractional)
        #[arg(long)]
        hours: f64,
    },
}

/// Config and ledger resolved from the global options
pub struct Context {
    pub config: Config,
    pub ledger: FileLedger,
}

impl Cli {
    fn context(&self) -> Context {
        let config_dir = self
            .config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let config = Config::load_from_dir(&config_dir);

        let ledger_path = match &self.ledger {
            Some(path) => path.clone(),
            None if config.ledger.file.is_absolute() => config.ledger.file.clone(),
            None => config_dir.join(&config.ledger.file),
        };

        Context {
            config,
            ledger: FileLedger::open(ledger_path),
        }
    }

    pub fn run(self) -> Result<()> {
        let context = self.context();
        let json = self.json;
        let quiet = self.quiet;

        match self.command {
            Commands::Order { snapshot, today } => order::run(order::OrderOptions {
                snapshot,
                today,
                context,
                json,
                quiet,
            }),
            Commands::Complete { snapshot, task, at } => complete::run(complete::CompleteOptions {
                snapshot,
                task,
                at,
                context,
                json,
                quiet,
            }),
            Commands::Hours { project, day } => hours::run(hours::HoursOptions {
                project,
                day,
                context,
                json,
                quiet,
            }),
            Commands::Log {
                project,
                day,
                hours,
            } => log::run(log::LogOptions {
                project,
                day,
                hours,
                context,
                json,
                quiet,
            }),
        }
    }
}

/// Parse a `--day`-style argument, or default to the local date
pub(crate) fn resolve_day(raw: Option<&str>) -> Result<chrono::NaiveDate> {
    match raw {
        Some(raw) => crate::dates::parse_day(raw).ok_or_else(|| {
            crate::error::Error::InvalidArgument(format!("unparseable day: {raw}"))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
