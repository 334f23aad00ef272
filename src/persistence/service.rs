//! Maps in-memory timers to the stored document and back.

use super::document::{ApplicationState, PersistedTask};
use super::error::Result;
use super::repository::{JsonTaskRepository, TaskRepository};
use crate::domain::{TaskTimer, MAX_ELAPSED_SECONDS};
use crate::report::export_file_name;
use chrono::{DateTime, Duration, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Build the on-disk snapshot of `tasks`.
///
/// Running timers are recorded as stopped with their elapsed time up to now;
/// start instants are dropped.
pub fn snapshot(tasks: &[TaskTimer], now: DateTime<Local>) -> ApplicationState {
    let tasks = tasks.iter().map(|task| to_persisted(task, now)).collect();
    ApplicationState::new(tasks, now)
}

fn to_persisted(task: &TaskTimer, now: DateTime<Local>) -> PersistedTask {
    let elapsed = task.current_elapsed();
    PersistedTask {
        description: task.description.clone(),
        elapsed_seconds: elapsed.num_milliseconds() as f64 / 1000.0,
        is_running: false,
        start_time: None,
        last_modified: now,
    }
}

fn from_persisted(task: &PersistedTask) -> TaskTimer {
    // Hand-edited files may carry absurd values; clamp rather than overflow later
    let seconds = task.elapsed_seconds.clamp(0.0, MAX_ELAPSED_SECONDS as f64);
    let millis = (seconds * 1000.0).round() as i64;
    TaskTimer::with_elapsed(task.description.clone(), Duration::milliseconds(millis))
}

/// Save/load/export facade over a [`TaskRepository`]
#[derive(Debug)]
pub struct PersistenceService<R = JsonTaskRepository> {
    repository: Arc<R>,
    export_dir: PathBuf,
}

impl<R: TaskRepository> PersistenceService<R> {
    pub fn new(repository: R, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository: Arc::new(repository),
            export_dir: export_dir.into(),
        }
    }

    /// Shared handle for the background save worker
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Snapshot and write the task list, replacing prior content
    pub fn save_state(&self, tasks: &[TaskTimer]) -> Result<()> {
        let state = snapshot(tasks, Local::now());
        self.repository.save_state(&state)
    }

    /// Rebuild stopped timers from storage, in stored order.
    /// `None` when nothing was saved or the saved list is empty.
    pub fn load_state(&self) -> Result<Option<Vec<TaskTimer>>> {
        let Some(state) = self.repository.load_state()? else {
            return Ok(None);
        };
        if state.tasks.is_empty() {
            return Ok(None);
        }
        Ok(Some(state.tasks.iter().map(from_persisted).collect()))
    }

    /// Load the raw stored document (for read-only reporting)
    pub fn load_document(&self) -> Result<Option<ApplicationState>> {
        self.repository.load_state()
    }

    /// Write the text report and return where it went.
    ///
    /// Relative names (and the generated default) land in the export directory.
    pub fn export_report(&self, tasks: &[TaskTimer], name: Option<&Path>) -> Result<PathBuf> {
        let now = Local::now();
        let state = snapshot(tasks, now);
        self.export_persisted(&state.tasks, name, now)
    }

    /// Export already-persisted tasks (used by the CLI without building timers)
    pub fn export_persisted(
        &self,
        tasks: &[PersistedTask],
        name: Option<&Path>,
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        let path = match name {
            Some(name) if name.is_absolute() => name.to_path_buf(),
            Some(name) => self.export_dir.join(name),
            None => self.export_dir.join(export_file_name(now)),
        };
        self.repository.export_text(tasks, &path)?;
        Ok(path)
    }

    pub fn has_saved_state(&self) -> bool {
        self.repository.has_saved_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::error::PersistenceError;
    use pretty_assertions::assert_eq;
    use std::time::{Duration as StdDuration, Instant};
    use tempfile::{tempdir, TempDir};

    fn service() -> (TempDir, PersistenceService) {
        let dir = tempdir().unwrap();
        let service = PersistenceService::new(JsonTaskRepository::new(dir.path()), dir.path());
        (dir, service)
    }

    fn summary(tasks: &[TaskTimer]) -> Vec<(String, i64, bool)> {
        tasks
            .iter()
            .map(|t| (t.description.clone(), t.elapsed().num_seconds(), t.is_running()))
            .collect()
    }

    #[test]
    fn test_round_trip_preserves_order_and_elapsed_and_stops_timers() {
        let (_dir, service) = service();
        let mut running = TaskTimer::with_elapsed("Running", Duration::minutes(10));
        running.start_at(Instant::now());
        let tasks = vec![
            TaskTimer::with_elapsed("First", Duration::hours(1)),
            running,
            TaskTimer::with_elapsed("Third", Duration::seconds(42)),
        ];

        service.save_state(&tasks).unwrap();
        let loaded = service.load_state().unwrap().unwrap();

        assert_eq!(
            summary(&loaded),
            vec![
                ("First".to_string(), 3600, false),
                ("Running".to_string(), 600, false),
                ("Third".to_string(), 42, false),
            ]
        );
    }

    #[test]
    fn test_loaded_timers_get_fresh_ids() {
        let (_dir, service) = service();
        let tasks = vec![TaskTimer::new("A")];

        service.save_state(&tasks).unwrap();
        let loaded = service.load_state().unwrap().unwrap();

        assert_ne!(loaded[0].id(), tasks[0].id());
        assert!(!loaded[0].has_pending_edit());
    }

    #[test]
    fn test_empty_save_loads_as_nothing() {
        let (_dir, service) = service();

        service.save_state(&[]).unwrap();

        assert!(service.has_saved_state());
        assert!(service.load_state().unwrap().is_none());
    }

    #[test]
    fn test_load_without_saved_state() {
        let (_dir, service) = service();
        assert!(!service.has_saved_state());
        assert!(service.load_state().unwrap().is_none());
    }

    #[test]
    fn test_snapshot_never_records_running_state() {
        let t0 = Instant::now() - StdDuration::from_secs(5);
        let mut task = TaskTimer::new("A");
        task.start_at(t0);

        let state = snapshot(&[task], Local::now());

        assert!(!state.tasks[0].is_running);
        assert!(state.tasks[0].start_time.is_none());
        assert!(state.tasks[0].elapsed_seconds >= 5.0);
        assert_eq!(state.version, "2.0.0");
    }

    #[test]
    fn test_corrupt_state_surfaces_error() {
        let (dir, service) = service();
        std::fs::write(
            dir.path().join(crate::persistence::repository::STATE_FILE_NAME),
            "[1, 2",
        )
        .unwrap();

        let err = service.load_state().unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt { .. }));
    }

    #[test]
    fn test_export_two_tasks_with_total() {
        let (dir, service) = service();
        let tasks = vec![
            TaskTimer::with_elapsed("Task one", Duration::hours(1)),
            TaskTimer::with_elapsed("Task two", Duration::hours(2)),
        ];

        let path = service.export_report(&tasks, None).unwrap();

        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("time_tracking_") && name.ends_with(".txt"));

        let content = std::fs::read_to_string(&path).unwrap();
        let entries: Vec<&str> = content
            .lines()
            .filter(|l| l.starts_with("1. ") || l.starts_with("2. "))
            .collect();
        assert_eq!(entries.len(), 2);
        assert!(content.contains("Total: 03:00:00"));
    }

    #[test]
    fn test_export_with_explicit_name() {
        let (dir, service) = service();

        let path = service
            .export_report(&[TaskTimer::new("A")], Some(Path::new("mine.txt")))
            .unwrap();
        assert_eq!(path, dir.path().join("mine.txt"));

        let absolute = dir.path().join("abs.txt");
        let path = service
            .export_report(&[TaskTimer::new("A")], Some(&absolute))
            .unwrap();
        assert_eq!(path, absolute);
        assert!(absolute.exists());
    }
}
