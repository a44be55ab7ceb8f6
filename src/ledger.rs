//! The work ledger: accumulated hours per (project, calendar day).
//!
//! This is the one piece of state the engine owns. Each subscription
//! project accrues fractional hours against the day a task completed;
//! the ordering engine reads today's totals to enforce the daily quota.
//! Records are created lazily on first accrual and never deleted here.
//!
//! `add_hours` must be an atomic increment: two completions for the
//! same project landing on the same day must both be counted. The
//! in-memory ledger holds a mutex across the read-modify-write; the
//! file ledger holds an advisory file lock (see `lock`) for the same
//! span, so the increment is atomic across processes too.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::ProjectId;

const LEDGER_SCHEMA_VERSION: &str = "tempo.ledger.v1";

/// Keyed store of accumulated daily hours.
///
/// Passed by handle into both the accrual updater and the ordering
/// engine; there is no process-wide singleton.
pub trait HoursLedger {
    /// Hours accumulated for a project on a day; 0 if no record exists
    fn hours(&self, project_id: ProjectId, day: NaiveDate) -> Result<f64>;

    /// Atomically add `delta` hours to a project's day, creating the
    /// record if absent. Returns the new total.
    fn add_hours(&self, project_id: ProjectId, day: NaiveDate, delta: f64) -> Result<f64>;
}

/// One (project, day) accumulation row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorkDayRecord {
    pub project_id: ProjectId,
    pub work_date: NaiveDate,
    pub hours: f64,
}

// =========================================================================
// In-memory ledger
// =========================================================================

/// In-process ledger backed by a mutexed map.
///
/// Suitable for embedding the engine behind a single service process,
/// and for tests.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: Mutex<HashMap<(ProjectId, NaiveDate), f64>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows currently held, in unspecified order
    pub fn records(&self) -> Vec<WorkDayRecord> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .iter()
            .map(|(&(project_id, work_date), &hours)| WorkDayRecord {
                project_id,
                work_date,
                hours,
            })
            .collect()
    }
}

impl HoursLedger for MemoryLedger {
    fn hours(&self, project_id: ProjectId, day: NaiveDate) -> Result<f64> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(&(project_id, day)).copied().unwrap_or(0.0))
    }

    fn add_hours(&self, project_id: ProjectId, day: NaiveDate, delta: f64) -> Result<f64> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let total = entries.entry((project_id, day)).or_insert(0.0);
        *total += delta;
        Ok(*total)
    }
}

// =========================================================================
// File-backed ledger
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerFile {
    schema_version: String,
    records: Vec<WorkDayRecord>,
}

impl LedgerFile {
    fn empty() -> Self {
        Self {
            schema_version: LEDGER_SCHEMA_VERSION.to_string(),
            records: Vec::new(),
        }
    }
}

/// Ledger persisted as a JSON file, shared between processes.
///
/// Reads and increments both run under an advisory lock on the
/// `<path>.lock` sidecar; the file itself is replaced atomically.
#[derive(Debug, Clone)]
pub struct FileLedger {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl FileLedger {
    /// Open a ledger at the given path. The file is created lazily on
    /// the first accrual.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows currently persisted, in file order
    pub fn records(&self) -> Result<Vec<WorkDayRecord>> {
        let _lock = self.acquire_lock()?;
        Ok(self.read_file()?.records)
    }

    fn acquire_lock(&self) -> Result<FileLock> {
        FileLock::acquire(lock::lock_path(&self.path), self.lock_timeout_ms)
    }

    fn read_file(&self) -> Result<LedgerFile> {
        if !self.path.exists() {
            return Ok(LedgerFile::empty());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_file(&self, file: &LedgerFile) -> Result<()> {
        let content = serde_json::to_string_pretty(file)?;
        lock::write_atomic(&self.path, content.as_bytes())
    }
}

impl HoursLedger for FileLedger {
    fn hours(&self, project_id: ProjectId, day: NaiveDate) -> Result<f64> {
        let _lock = self.acquire_lock()?;
        let file = self.read_file()?;
        Ok(file
            .records
            .iter()
            .find(|record| record.project_id == project_id && record.work_date == day)
            .map(|record| record.hours)
            .unwrap_or(0.0))
    }

    fn add_hours(&self, project_id: ProjectId, day: NaiveDate, delta: f64) -> Result<f64> {
        // Lock held across read-modify-write: this is what makes the
        // increment atomic rather than last-writer-wins.
        let _lock = self.acquire_lock()?;
        let mut file = self.read_file()?;

        let total = match file
            .records
            .iter_mut()
            .find(|record| record.project_id == project_id && record.work_date == day)
        {
            Some(record) => {
                record.hours += delta;
                record.hours
            }
            None => {
                file.records.push(WorkDayRecord {
                    project_id,
                    work_date: day,
                    hours: delta,
                });
                delta
            }
        };

        self.write_file(&file)?;
        debug!(project_id, day = %day, delta, total, "ledger accrual");
        Ok(total)
    }
}
