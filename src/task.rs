//! Task and project snapshot records.
//!
//! These are the engine's read-only inputs, fetched in bulk from the
//! record store by the caller. Temporal fields stay as raw strings:
//! the store keeps them as text and may hold malformed values, and the
//! engine's policy is to tolerate those rather than reject the record.
//! Parsing happens at use sites through the `dates` module.
//!
//! Every query path produces the same named-field `Task`; there is no
//! query-shape-dependent schema.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SNAPSHOT_SCHEMA_VERSION: &str = "tempo.snapshot.v1";

/// Identifier of a task in the record store
pub type TaskId = i64;

/// Identifier of a project in the record store
pub type ProjectId = i64;

fn default_schema_version() -> String {
    SNAPSHOT_SCHEMA_VERSION.to_string()
}

/// A task as the record store hands it to the engine.
///
/// Invariant (maintained by the caller, not re-checked here):
/// `completed_at` is set iff `completed` is true, and `started_at` is
/// cleared when a task transitions to completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    /// Creation timestamp as stored; unparseable values sort as today
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Due date, as a timestamp or plain `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// Set when active work began; cleared on completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default)]
    pub price: f64,
}

/// The slice of a project the engine can see
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
    /// Retainer client subject to the daily hours quota
    #[serde(default)]
    pub is_subscription: bool,
}

/// A consistent snapshot of tasks and projects across the store.
///
/// One snapshot backs one `order` call; cross-call consistency is not
/// required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            schema_version: default_schema_version(),
            tasks: Vec::new(),
            projects: Vec::new(),
        }
    }

    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::SnapshotNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }

    /// Save a snapshot to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_loads_minimal_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(
            &path,
            r#"{
  "tasks": [
    {"id": 1, "project_id": 10, "title": "write report", "created_at": "2024-03-01T09:00:00Z"}
  ],
  "projects": [
    {"id": 10, "name": "acme", "is_subscription": true}
  ]
}"#,
        )
        .unwrap();

        let snapshot = Snapshot::load(&path).unwrap();
        assert_eq!(snapshot.schema_version, SNAPSHOT_SCHEMA_VERSION);
        assert_eq!(snapshot.tasks.len(), 1);
        let task = snapshot.task(1).unwrap();
        assert!(!task.completed);
        assert_eq!(task.price, 0.0);
        assert!(task.deadline.is_none());
        assert!(snapshot.project(10).unwrap().is_subscription);
    }

    #[test]
    fn snapshot_load_missing_file_is_user_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::SnapshotNotFound(_)));
        assert_eq!(err.exit_code(), crate::error::exit_codes::USER_ERROR);
    }

    #[test]
    fn snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut snapshot = Snapshot::empty();
        snapshot.tasks.push(Task {
            id: 7,
            project_id: 2,
            title: "fix login".to_string(),
            description: String::new(),
            completed: true,
            created_at: "2024-02-20T08:00:00Z".to_string(),
            completed_at: Some("2024-02-21T17:00:00Z".to_string()),
            deadline: None,
            started_at: None,
            price: 120.0,
        });
        snapshot.save(&path).unwrap();

        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded.tasks[0].id, 7);
        assert!(loaded.tasks[0].completed);
        assert_eq!(loaded.tasks[0].price, 120.0);
    }
}
