//! Single-running-timer enforcement.
//!
//! The coordinator only knows task ids; the timers themselves live in the
//! controller's ordered task list and are passed in when they need stopping.

use crate::domain::{TaskId, TimerHandle};
use std::collections::HashSet;
use tracing::debug;

/// Registry of timers that take part in "only one runs at a time"
#[derive(Debug, Default)]
pub struct TimerCoordinator {
    registered: HashSet<TaskId>,
}

impl TimerCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timer to the registry. Returns false if it was already there.
    pub fn register(&mut self, id: TaskId) -> bool {
        self.registered.insert(id)
    }

    /// Remove a timer from the registry. Absent ids are ignored.
    pub fn unregister(&mut self, id: TaskId) -> bool {
        self.registered.remove(&id)
    }

    pub fn is_registered(&self, id: TaskId) -> bool {
        self.registered.contains(&id)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    /// Unregister everything (teardown)
    pub fn clear(&mut self) {
        self.registered.clear();
    }

    /// Stop every registered, running timer other than `except`.
    ///
    /// `None` stops all of them. Unregistered timers are left alone.
    /// Returns the ids that were stopped, in iteration order.
    pub fn stop_all_except<'a, T, I>(&self, except: Option<TaskId>, timers: I) -> Vec<TaskId>
    where
        T: TimerHandle + 'a,
        I: IntoIterator<Item = &'a mut T>,
    {
        let mut stopped = Vec::new();
        for timer in timers {
            let id = timer.id();
            if Some(id) == except || !self.registered.contains(&id) || !timer.is_running() {
                continue;
            }
            timer.stop();
            debug!(task = %id, "stopped by coordinator");
            stopped.push(id);
        }
        stopped
    }
}
