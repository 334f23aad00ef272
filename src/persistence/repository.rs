use super::document::{ApplicationState, PersistedTask};
use super::error::{PersistenceError, Result};
use super::files::{atomic_write, read_optional};
use crate::report::render_export;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the saved session inside the data directory
pub const STATE_FILE_NAME: &str = "worktimetracker_state.json";

/// Durable storage for the application state.
///
/// Implementations only touch the filesystem (or whatever backs them) through
/// read/write/exists; mapping to and from timers happens in the service.
pub trait TaskRepository {
    /// Replace any previously saved state
    fn save_state(&self, state: &ApplicationState) -> Result<()>;

    /// `Ok(None)` when nothing was ever saved
    fn load_state(&self) -> Result<Option<ApplicationState>>;

    /// Write the human-readable report to `path`
    fn export_text(&self, tasks: &[PersistedTask], path: &Path) -> Result<()>;

    /// Existence check only; does not parse
    fn has_saved_state(&self) -> bool;
}

/// Pretty-printed JSON file in the data directory
#[derive(Debug, Clone)]
pub struct JsonTaskRepository {
    state_path: PathBuf,
}

impl JsonTaskRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            state_path: data_dir.as_ref().join(STATE_FILE_NAME),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }
}

impl TaskRepository for JsonTaskRepository {
    fn save_state(&self, state: &ApplicationState) -> Result<()> {
        let json = serde_json::to_string_pretty(state).map_err(PersistenceError::Encode)?;
        atomic_write(&self.state_path, &json)
            .map_err(|e| PersistenceError::io("write", &self.state_path, e))?;

        info!(
            path = %self.state_path.display(),
            tasks = state.tasks.len(),
            "saved application state"
        );
        Ok(())
    }

    fn load_state(&self) -> Result<Option<ApplicationState>> {
        let Some(content) = read_optional(&self.state_path)
            .map_err(|e| PersistenceError::io("read", &self.state_path, e))?
        else {
            debug!(path = %self.state_path.display(), "no saved state");
            return Ok(None);
        };

        let state: ApplicationState =
            serde_json::from_str(&content).map_err(|source| PersistenceError::Corrupt {
                path: self.state_path.clone(),
                source,
            })?;

        info!(
            path = %self.state_path.display(),
            tasks = state.tasks.len(),
            version = %state.version,
            "loaded application state"
        );
        Ok(Some(state))
    }

    fn export_text(&self, tasks: &[PersistedTask], path: &Path) -> Result<()> {
        let report = render_export(tasks, Local::now());
        atomic_write(path, &report).map_err(|e| PersistenceError::io("export to", path, e))?;

        info!(path = %path.display(), tasks = tasks.len(), "exported report");
        Ok(())
    }

    fn has_saved_state(&self) -> bool {
        self.state_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn task(description: &str, elapsed_seconds: f64) -> PersistedTask {
        PersistedTask {
            description: description.to_string(),
            elapsed_seconds,
            is_running: false,
            start_time: None,
            last_modified: Local::now(),
        }
    }

    #[test]
    fn test_load_without_file_is_none() {
        let dir = tempdir().unwrap();
        let repo = JsonTaskRepository::new(dir.path());

        assert!(!repo.has_saved_state());
        assert!(repo.load_state().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let repo = JsonTaskRepository::new(dir.path());
        let state = ApplicationState::new(vec![task("A", 1.5), task("B", 3600.0)], Local::now());

        repo.save_state(&state).unwrap();
        assert!(repo.has_saved_state());

        let loaded = repo.load_state().unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_save_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let repo = JsonTaskRepository::new(dir.path());

        repo.save_state(&ApplicationState::new(vec![task("old", 1.0)], Local::now()))
            .unwrap();
        repo.save_state(&ApplicationState::new(vec![task("new", 2.0)], Local::now()))
            .unwrap();

        let loaded = repo.load_state().unwrap().unwrap();
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].description, "new");
    }

    #[test]
    fn test_save_creates_missing_data_dir() {
        let dir = tempdir().unwrap();
        let repo = JsonTaskRepository::new(dir.path().join("not").join("yet"));

        repo.save_state(&ApplicationState::new(Vec::new(), Local::now()))
            .unwrap();
        assert!(repo.has_saved_state());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempdir().unwrap();
        let repo = JsonTaskRepository::new(dir.path());
        std::fs::write(repo.state_path(), "{ not json").unwrap();

        // Existence check does not parse
        assert!(repo.has_saved_state());

        let err = repo.load_state().unwrap_err();
        assert!(err.is_corrupt(), "unexpected error: {err}");
        assert!(err.to_string().contains(STATE_FILE_NAME));
    }

    #[test]
    fn test_unreadable_state_is_io_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be cannot be read as text
        std::fs::create_dir(dir.path().join(STATE_FILE_NAME)).unwrap();
        let repo = JsonTaskRepository::new(dir.path());

        let err = repo.load_state().unwrap_err();
        assert!(matches!(err, PersistenceError::Io { action: "read", .. }));
    }

    #[test]
    fn test_export_text_writes_report() {
        let dir = tempdir().unwrap();
        let repo = JsonTaskRepository::new(dir.path());
        let out = dir.path().join("report.txt");

        repo.export_text(&[task("One", 3600.0), task("Two", 7200.0)], &out)
            .unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.starts_with("Work Time Tracker - "));
        assert!(content.contains("1. One"));
        assert!(content.contains("2. Two"));
        assert!(content.ends_with("Total: 03:00:00\n"));
    }
}
