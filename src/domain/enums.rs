/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    /// Typing into the selected task's description (uncommitted until leaving)
    EditingDescription,
}

/// Kind of committed change recorded by the dirty tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    TimerChanged,
}

impl ChangeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TaskCreated => "task-created",
            Self::TaskUpdated => "task-updated",
            Self::TaskDeleted => "task-deleted",
            Self::TimerChanged => "timer-changed",
        }
    }
}
