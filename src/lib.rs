//! tempo - Task Prioritization & Subscription-Quota Engine
//!
//! Given a snapshot of tasks and projects from a record store, this
//! library computes the single order the user should work tasks in,
//! while enforcing a daily time budget for subscription (retainer)
//! clients via a per-(project, day) hours ledger.
//!
//! # Core Concepts
//!
//! - **Work ledger**: accumulated hours per (project, calendar day),
//!   the one piece of state the engine owns
//! - **Accrual**: folding a completed task's measured duration into the
//!   owning subscription project's daily ledger entry
//! - **Quota**: the soft daily cap (3 hours by default) that defers a
//!   subscription project's remaining tasks once reached
//! - **Priority order**: oldest-first by creation date, with price
//!   breaking same-day ties when the deadline leaves headroom
//!
//! # Module Organization
//!
//! - `cli`: command-line driver using clap
//! - `config`: configuration loading from `.tempo.toml`
//! - `error`: error types and result aliases
//! - `dates`: lenient parsing of store-provided timestamp text
//! - `task`: task/project snapshot records
//! - `ledger`: the hours ledger (in-memory and file-backed)
//! - `accrual`: completion accrual updater
//! - `order`: the ordering engine
//! - `lock`: file locking and atomic writes for the shared ledger
//! - `output`: CLI output formatting

pub mod accrual;
pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod ledger;
pub mod lock;
pub mod order;
pub mod output;
pub mod task;

pub use error::{Error, Result};
