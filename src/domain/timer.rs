use chrono::Duration;
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// Stable in-memory identity of a task (not persisted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cap on any elapsed value, about a century
pub const MAX_ELAPSED_SECONDS: i64 = 100 * 365 * 24 * 3600;

fn max_elapsed() -> Duration {
    Duration::seconds(MAX_ELAPSED_SECONDS)
}

/// Add two elapsed values, saturating to `[0, MAX_ELAPSED_SECONDS]`
pub fn add_elapsed(a: Duration, b: Duration) -> Duration {
    match a.checked_add(&b) {
        Some(sum) => sum.clamp(Duration::zero(), max_elapsed()),
        None => max_elapsed(),
    }
}

/// Anything the timer coordinator can stop on behalf of another timer
pub trait TimerHandle {
    fn id(&self) -> TaskId;
    fn is_running(&self) -> bool;
    fn stop(&mut self);
}

/// Per-task stopwatch: a description plus accumulated elapsed time.
///
/// `started_at` is the only running-state field, so "running implies a start
/// instant" holds by construction. Elapsed never goes below zero.
#[derive(Debug, Clone)]
pub struct TaskTimer {
    id: TaskId,
    /// Free-form description, edited in place
    pub description: String,
    /// Last description value that was committed as a change
    committed_description: String,
    elapsed: Duration,
    /// When the current running segment started (never persisted)
    started_at: Option<Instant>,
}

impl TaskTimer {
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_elapsed(description, Duration::zero())
    }

    /// Build a stopped timer with some elapsed time already on it (used on load)
    pub fn with_elapsed(description: impl Into<String>, elapsed: Duration) -> Self {
        let description = description.into();
        Self {
            id: TaskId::new(),
            committed_description: description.clone(),
            description,
            elapsed: elapsed.clamp(Duration::zero(), max_elapsed()),
            started_at: None,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Elapsed time as of the last start/stop/refresh
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time including the running segment up to `now`
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started) => add_elapsed(self.elapsed, since(started, now)),
            None => self.elapsed,
        }
    }

    /// Elapsed time including the running segment up to this moment
    pub fn current_elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    /// Start the timer; already running timers keep their original start
    pub fn start_at(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    /// Stop the timer and fold the running segment into elapsed
    pub fn stop_at(&mut self, now: Instant) {
        if let Some(started) = self.started_at.take() {
            self.elapsed = add_elapsed(self.elapsed, since(started, now));
        }
    }

    /// Zero the elapsed time and stop
    pub fn reset(&mut self) {
        self.started_at = None;
        self.elapsed = Duration::zero();
    }

    /// Apply a manual correction, clamped at zero.
    /// A running timer stays running; its current segment is folded in first.
    pub fn adjust_at(&mut self, delta: Duration, now: Instant) {
        self.refresh_at(now);
        self.elapsed = add_elapsed(self.elapsed, delta);
    }

    /// Roll a running timer forward so `elapsed()` is current (called on clock ticks)
    pub fn refresh_at(&mut self, now: Instant) {
        if let Some(started) = self.started_at {
            self.elapsed = add_elapsed(self.elapsed, since(started, now));
            self.started_at = Some(now);
        }
    }

    /// Record the current description as committed.
    /// Returns true when it differs from the previously committed value.
    pub fn commit_description(&mut self) -> bool {
        if self.committed_description == self.description {
            return false;
        }
        self.committed_description = self.description.clone();
        true
    }

    /// Whether the description has uncommitted edits
    pub fn has_pending_edit(&self) -> bool {
        self.committed_description != self.description
    }
}

impl TimerHandle for TaskTimer {
    fn id(&self) -> TaskId {
        self.id
    }

    fn is_running(&self) -> bool {
        TaskTimer::is_running(self)
    }

    fn stop(&mut self) {
        TaskTimer::stop(self);
    }
}

fn since(started: Instant, now: Instant) -> Duration {
    Duration::from_std(now.saturating_duration_since(started)).unwrap_or(Duration::zero())
}
