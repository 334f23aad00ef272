//! Unsaved-change tracking.
//!
//! Only committed changes mark the tracker. Listeners hear about the flag
//! flipping, not about every individual mark.

use crate::domain::ChangeKind;
use std::fmt;
use tracing::debug;

/// Callback invoked with the new value of the dirty flag
pub type DirtyListener = Box<dyn FnMut(bool)>;

#[derive(Default)]
pub struct DirtyTracker {
    has_unsaved_changes: bool,
    /// Bumped on every mark; lets a finished save tell whether it is stale
    generation: u64,
    listeners: Vec<DirtyListener>,
}

impl fmt::Debug for DirtyTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyTracker")
            .field("has_unsaved_changes", &self.has_unsaved_changes)
            .field("generation", &self.generation)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn subscribe(&mut self, listener: impl FnMut(bool) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn mark_task_created(&mut self) {
        self.mark(ChangeKind::TaskCreated);
    }

    pub fn mark_task_updated(&mut self) {
        self.mark(ChangeKind::TaskUpdated);
    }

    pub fn mark_task_deleted(&mut self) {
        self.mark(ChangeKind::TaskDeleted);
    }

    pub fn mark_timer_changed(&mut self) {
        self.mark(ChangeKind::TimerChanged);
    }

    pub fn mark(&mut self, kind: ChangeKind) {
        self.generation += 1;
        debug!(change = kind.name(), generation = self.generation, "committed change");
        self.set(true);
    }

    pub fn mark_saved(&mut self) {
        self.set(false);
    }

    /// Clear the flag only if nothing was marked after `generation` was read.
    /// Returns whether the flag was cleared.
    pub fn mark_saved_through(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.set(false);
        true
    }

    fn set(&mut self, value: bool) {
        if self.has_unsaved_changes == value {
            return;
        }
        self.has_unsaved_changes = value;
        for listener in &mut self.listeners {
            listener(value);
        }
    }
}
