//! Shared fixtures for CLI tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tempo::task::{Project, Snapshot, Task};

pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.path().join("ledger.json")
    }

    pub fn write_snapshot(&self, snapshot: &Snapshot) -> PathBuf {
        let path = self.dir.path().join("snapshot.json");
        snapshot.save(&path).expect("failed to write snapshot");
        path
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.dir.path().join(".tempo.toml");
        std::fs::write(&path, contents).expect("failed to write config");
        path
    }
}

pub fn project(id: i64, name: &str, is_subscription: bool) -> Project {
    Project {
        id,
        name: name.to_string(),
        is_subscription,
    }
}

pub fn open_task(id: i64, project_id: i64, title: &str, created_at: &str) -> Task {
    Task {
        id,
        project_id,
        title: title.to_string(),
        description: String::new(),
        completed: false,
        created_at: created_at.to_string(),
        completed_at: None,
        deadline: None,
        started_at: None,
        price: 0.0,
    }
}

pub fn fixture_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::empty();
    snapshot.projects = vec![
        project(1, "retainer-a", true),
        project(2, "retainer-b", true),
        project(3, "one-off", false),
    ];

    let mut started = open_task(101, 1, "rotate keys", "2024-03-01T09:00:00Z");
    started.started_at = Some("2024-03-10T09:00:00Z".to_string());

    snapshot.tasks = vec![
        started,
        open_task(102, 2, "update dns", "2024-03-02T09:00:00Z"),
        open_task(103, 3, "landing page", "2024-02-15T09:00:00Z"),
    ];
    snapshot
}
