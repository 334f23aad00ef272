use crate::config::Config;
use crate::coordinator::TimerCoordinator;
use crate::dirty::DirtyTracker;
use crate::domain::{format_hms, total_elapsed, truncate_label, TaskId, TaskTimer, UiMode};
use crate::notifications::NotificationCenter;
use crate::persistence::{snapshot, PersistenceService, SaveJob, SaveWorker};
use crate::ticker::Ticker;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Longest description shown in the delete prompt
const DELETE_PROMPT_CHARS: usize = 15;

/// Deferred commands carried by a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    DeleteTask(TaskId),
    ResetAllTimers,
    LoadSaved,
}

/// Main application state.
///
/// Owns the ordered task list and every coordinator around it; all mutation
/// happens here, on the event loop thread.
pub struct App {
    pub tasks: Vec<TaskTimer>,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub should_quit: bool,
    /// Wall-clock time shown in the header, updated by the clock
    pub current_time: DateTime<Local>,
    config: Config,
    coordinator: TimerCoordinator,
    dirty: DirtyTracker,
    notifier: NotificationCenter<PendingAction>,
    clock: Ticker,
    persistence: PersistenceService,
    save_worker: Option<SaveWorker>,
    /// One entry per submitted background save: whether to announce it
    saves_in_flight: VecDeque<bool>,
    /// Last generation handed to an autosave, so failures are not retried
    last_autosave_generation: u64,
}

impl App {
    pub fn new(config: Config, persistence: PersistenceService) -> Self {
        let save_worker = match SaveWorker::spawn(persistence.repository()) {
            Ok(worker) => Some(worker),
            Err(e) => {
                warn!(error = %e, "could not start save worker; saving synchronously");
                None
            }
        };

        let mut dirty = DirtyTracker::new();
        dirty.subscribe(|unsaved| debug!(unsaved, "unsaved changes flag changed"));

        let mut notifier = NotificationCenter::new(config.notification_duration());
        notifier.subscribe(|event| debug!(?event, "notification visibility changed"));

        Self {
            tasks: Vec::new(),
            selected_index: 0,
            ui_mode: UiMode::Normal,
            should_quit: false,
            current_time: Local::now(),
            notifier,
            clock: Ticker::new(config.clock_interval()),
            config,
            coordinator: TimerCoordinator::new(),
            dirty,
            persistence,
            save_worker,
            saves_in_flight: VecDeque::new(),
            last_autosave_generation: 0,
        }
    }

    /// Start the display clock
    pub fn start_clock(&mut self, now: Instant) {
        self.clock.start(now);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn notifier(&self) -> &NotificationCenter<PendingAction> {
        &self.notifier
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty.has_unsaved_changes()
    }

    // --- selection ---

    pub fn selected_task(&self) -> Option<&TaskTimer> {
        self.tasks.get(self.selected_index)
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.id())
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.tasks.len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected_index >= self.tasks.len() {
            self.selected_index = self.tasks.len().saturating_sub(1);
        }
    }

    fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id() == id)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut TaskTimer> {
        self.tasks.iter_mut().find(|t| t.id() == id)
    }

    // --- task list ---

    /// Append a task, select it, and register it with the coordinator
    pub fn add_task(&mut self, description: impl Into<String>, now: Instant) -> TaskId {
        let task = TaskTimer::new(description);
        let id = task.id();
        self.coordinator.register(id);
        self.tasks.push(task);
        self.selected_index = self.tasks.len() - 1;
        self.dirty.mark_task_created();
        self.notifier.show_notification("Task added.", now);
        id
    }

    /// Ask before deleting a task
    pub fn request_remove(&mut self, id: TaskId) {
        let Some(task) = self.tasks.iter().find(|t| t.id() == id) else {
            return;
        };
        let prompt = format!("Delete? {}", truncate_label(&task.description, DELETE_PROMPT_CHARS));
        self.notifier
            .show_confirmation(prompt, PendingAction::DeleteTask(id), None);
    }

    pub fn request_remove_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.request_remove(id);
        }
    }

    /// Delete without asking (the confirmed half of `request_remove`)
    pub fn remove_task(&mut self, id: TaskId, now: Instant) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let mut task = self.tasks.remove(index);
        task.stop_at(now);
        self.coordinator.unregister(id);
        self.clamp_selection();
        self.dirty.mark_task_deleted();
        self.notifier.show_notification("Task deleted.", now);
    }

    pub fn request_clear_all(&mut self) {
        self.notifier.show_confirmation(
            "Confirm reset all timers?",
            PendingAction::ResetAllTimers,
            None,
        );
    }

    /// Stop every timer and zero its elapsed time
    pub fn reset_all_timers(&mut self, now: Instant) {
        let stopped = self.coordinator.stop_all_except(None, self.tasks.iter_mut());
        for task in &mut self.tasks {
            task.reset();
        }
        info!(tasks = self.tasks.len(), stopped = stopped.len(), "reset all timers");
        self.dirty.mark_timer_changed();
        self.notifier.show_notification("All timers reset.", now);
    }

    /// Swap in a freshly loaded list, dropping the old timers
    fn replace_tasks(&mut self, tasks: Vec<TaskTimer>) {
        self.coordinator.stop_all_except(None, self.tasks.iter_mut());
        self.coordinator.clear();
        for task in &tasks {
            self.coordinator.register(task.id());
        }
        self.tasks = tasks;
        self.selected_index = 0;
        self.ui_mode = UiMode::Normal;
    }

    // --- confirmations ---

    pub fn confirm(&mut self, now: Instant) {
        if let Some(action) = self.notifier.confirm() {
            self.dispatch(action, now);
        }
    }

    pub fn cancel(&mut self, now: Instant) {
        if let Some(action) = self.notifier.cancel() {
            self.dispatch(action, now);
        }
    }

    fn dispatch(&mut self, action: PendingAction, now: Instant) {
        debug!(?action, "dispatching confirmed action");
        match action {
            PendingAction::DeleteTask(id) => self.remove_task(id, now),
            PendingAction::ResetAllTimers => self.reset_all_timers(now),
            PendingAction::LoadSaved => self.load_saved(now),
        }
    }

    // --- timers ---

    /// Start one timer; every other running timer is stopped first
    pub fn start_timer(&mut self, id: TaskId, now: Instant) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        if self.tasks[index].is_running() {
            return;
        }
        if !self.coordinator.is_registered(id) {
            warn!(task = %id, "refusing to start an unregistered timer");
            return;
        }
        let stopped = self
            .coordinator
            .stop_all_except(Some(id), self.tasks.iter_mut());
        if !stopped.is_empty() {
            debug!(started = %id, stopped = stopped.len(), "switched running timer");
        }
        self.tasks[index].start_at(now);
        self.dirty.mark_timer_changed();
    }

    pub fn stop_timer(&mut self, id: TaskId, now: Instant) {
        let Some(task) = self.task_mut(id) else {
            return;
        };
        if !task.is_running() {
            return;
        }
        task.stop_at(now);
        self.dirty.mark_timer_changed();
    }

    pub fn toggle_timer(&mut self, id: TaskId, now: Instant) {
        let running = self.tasks.iter().any(|t| t.id() == id && t.is_running());
        if running {
            self.stop_timer(id, now);
        } else {
            self.start_timer(id, now);
        }
    }

    pub fn toggle_selected(&mut self, now: Instant) {
        if let Some(id) = self.selected_id() {
            self.toggle_timer(id, now);
        }
    }

    pub fn adjust_timer(&mut self, id: TaskId, delta: Duration, now: Instant) {
        let Some(task) = self.task_mut(id) else {
            return;
        };
        task.adjust_at(delta, now);
        self.dirty.mark_timer_changed();
    }

    /// Add (or with `forward == false`, remove) one configured step
    pub fn adjust_selected(&mut self, forward: bool, now: Instant) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let step = self.config.adjust_step();
        let delta = if forward { step } else { -step };
        self.adjust_timer(id, delta, now);
    }

    // --- description editing ---

    pub fn begin_edit(&mut self) {
        if self.selected_task().is_some() {
            self.ui_mode = UiMode::EditingDescription;
        }
    }

    /// Typing is a transient edit; nothing is marked until commit
    pub fn edit_push(&mut self, c: char) {
        if let Some(task) = self.tasks.get_mut(self.selected_index) {
            task.description.push(c);
        }
    }

    pub fn edit_pop(&mut self) {
        if let Some(task) = self.tasks.get_mut(self.selected_index) {
            task.description.pop();
        }
    }

    /// Record a description change if the text actually differs
    pub fn commit_description(&mut self, id: TaskId) -> bool {
        let changed = self
            .task_mut(id)
            .map(|task| task.commit_description())
            .unwrap_or(false);
        if changed {
            self.dirty.mark_task_updated();
        }
        changed
    }

    pub fn finish_edit(&mut self) {
        if let Some(id) = self.selected_id() {
            self.commit_description(id);
        }
        self.ui_mode = UiMode::Normal;
    }

    // --- persistence ---

    /// Restore the last session, if any. Failures leave an empty list.
    pub fn restore_on_startup(&mut self, now: Instant) {
        if !self.persistence.has_saved_state() {
            debug!("no previous session to restore");
            return;
        }
        match self.persistence.load_state() {
            Ok(Some(tasks)) => {
                let count = tasks.len();
                self.replace_tasks(tasks);
                info!(tasks = count, "restored previous session");
                self.notifier
                    .show_notification(format!("Loaded {} tasks.", count), now);
            }
            Ok(None) => debug!("no previous session to restore"),
            Err(e) => {
                error!(error = %e, corrupt = e.is_corrupt(), "failed to restore previous session");
                self.notifier
                    .show_notification(format!("Failed to load data: {}", e), now);
            }
        }
    }

    /// Load from storage, asking first when that would discard changes
    pub fn request_load(&mut self, now: Instant) {
        if self.dirty.has_unsaved_changes() {
            self.notifier.show_confirmation(
                "Discard unsaved changes and load?",
                PendingAction::LoadSaved,
                None,
            );
        } else {
            self.load_saved(now);
        }
    }

    /// Replace the task list with the saved one
    pub fn load_saved(&mut self, now: Instant) {
        match self.persistence.load_state() {
            Ok(Some(tasks)) => {
                let count = tasks.len();
                self.replace_tasks(tasks);
                self.dirty.mark_saved();
                self.notifier
                    .show_notification(format!("Loaded {} tasks.", count), now);
            }
            Ok(None) => self.notifier.show_notification("No saved data found.", now),
            Err(e) => {
                error!(error = %e, "load failed");
                self.notifier
                    .show_notification(format!("Failed to load data: {}", e), now);
            }
        }
    }

    /// Hand a snapshot to the save worker; the result arrives via `poll_saves`
    pub fn save_in_background(&mut self, now: Instant) {
        self.submit_save(true, now);
    }

    fn submit_save(&mut self, announce: bool, now: Instant) {
        let job = SaveJob {
            generation: self.dirty.generation(),
            state: snapshot(&self.tasks, Local::now()),
        };

        let Some(worker) = &self.save_worker else {
            self.save_inline(announce, now);
            return;
        };
        match worker.submit(job) {
            Ok(()) => self.saves_in_flight.push_back(announce),
            Err(_) => {
                warn!("save worker is gone; saving synchronously");
                self.save_worker = None;
                self.save_inline(announce, now);
            }
        }
    }

    fn save_inline(&mut self, announce: bool, now: Instant) {
        match self.save_now() {
            Ok(()) if announce => self.notifier.show_notification("Data saved.", now),
            Ok(()) => {}
            Err(e) => {
                error!(error = %e, "save failed");
                self.notifier
                    .show_notification(format!("Failed to save data: {:#}", e), now);
            }
        }
    }

    /// Drain finished background saves
    pub fn poll_saves(&mut self, now: Instant) {
        let Some(worker) = &self.save_worker else {
            return;
        };
        let mut outcomes = Vec::new();
        while let Some(outcome) = worker.try_recv() {
            outcomes.push(outcome);
        }

        for outcome in outcomes {
            let announce = self.saves_in_flight.pop_front().unwrap_or(true);
            match outcome.result {
                Ok(()) => {
                    let cleared = self.dirty.mark_saved_through(outcome.generation);
                    debug!(generation = outcome.generation, cleared, "background save finished");
                    if announce {
                        self.notifier.show_notification(
                            format!("Data saved ({} tasks).", outcome.task_count),
                            now,
                        );
                    }
                }
                Err(e) => {
                    error!(error = %e, "background save failed");
                    self.notifier
                        .show_notification(format!("Failed to save data: {}", e), now);
                }
            }
        }
    }

    pub fn saves_pending(&self) -> usize {
        self.saves_in_flight.len()
    }

    /// Write the current list synchronously
    pub fn save_now(&mut self) -> Result<()> {
        self.persistence
            .save_state(&self.tasks)
            .context("Failed to save application state")?;
        self.dirty.mark_saved();
        Ok(())
    }

    /// Let queued background saves land before anything else touches the file
    fn finish_background_saves(&mut self, now: Instant) {
        if let Some(worker) = self.save_worker.as_mut() {
            worker.shutdown();
        }
        self.poll_saves(now);
        self.save_worker = None;
        self.saves_in_flight.clear();
    }

    /// Stop every timer, then save. Called once before teardown.
    pub fn save_on_exit(&mut self, now: Instant) -> Result<()> {
        self.finish_background_saves(now);
        for task in &mut self.tasks {
            task.stop_at(now);
        }
        self.save_now()?;
        info!(tasks = self.tasks.len(), "saved on exit");
        Ok(())
    }

    /// Write the text report into the export directory
    pub fn export_report(&mut self, now: Instant) {
        match self.persistence.export_report(&self.tasks, None) {
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                self.notifier
                    .show_notification(format!("Data exported to {}", name), now);
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.notifier
                    .show_notification(format!("Failed to export data: {}", e), now);
            }
        }
    }

    // --- loop ---

    /// Advance clocks and drain background work. Called every loop iteration.
    pub fn tick(&mut self, now: Instant) {
        if self.clock.poll(now) {
            for task in self.tasks.iter_mut().filter(|t| t.is_running()) {
                task.refresh_at(now);
            }
            self.current_time = Local::now();
        }
        self.notifier.poll(now);
        self.poll_saves(now);
        self.maybe_autosave(now);
    }

    fn maybe_autosave(&mut self, now: Instant) {
        if !self.config.autosave || !self.dirty.has_unsaved_changes() {
            return;
        }
        let generation = self.dirty.generation();
        if generation == self.last_autosave_generation || !self.saves_in_flight.is_empty() {
            return;
        }
        self.last_autosave_generation = generation;
        self.submit_save(false, now);
    }

    /// Combined elapsed time as of the last clock tick
    pub fn total_time_label(&self) -> String {
        format!("Total Time: {}", format_hms(total_elapsed(&self.tasks)))
    }

    /// Stop the clock and every timer, and unregister everything
    pub fn cleanup(&mut self) {
        let clock_was_running = self.clock.is_running();
        self.clock.stop();
        let stopped = self
            .coordinator
            .stop_all_except(None, self.tasks.iter_mut());
        let registered = self.coordinator.registered_count();
        self.coordinator.clear();
        if let Some(mut worker) = self.save_worker.take() {
            worker.shutdown();
        }
        self.saves_in_flight.clear();
        info!(
            stopped = stopped.len(),
            registered,
            clock_was_running,
            "cleaned up"
        );
    }
}
