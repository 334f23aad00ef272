//! Transient info messages and yes/no confirmations.
//!
//! Only one message is on screen at a time. Confirmation actions are plain
//! values handed back to the caller on confirm/cancel; the caller dispatches
//! them, which keeps the pending "callbacks" free of borrows into the app.

use crate::ticker::{OneShot, ScheduleHandle};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long an info message stays up unless replaced
pub const DEFAULT_NOTIFICATION_SECS: u64 = 3;

/// What is currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationState {
    Idle,
    ShowingInfo(String),
    ShowingConfirm(String),
}

/// Visibility changes published to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    InfoShown,
    InfoHidden,
    ConfirmShown,
    ConfirmHidden,
}

pub type NotificationListener = Box<dyn FnMut(NotificationEvent)>;

#[derive(Debug)]
struct PendingConfirmation<A> {
    on_confirm: A,
    on_cancel: Option<A>,
}

pub struct NotificationCenter<A> {
    state: NotificationState,
    pending: Option<PendingConfirmation<A>>,
    auto_hide: OneShot,
    /// Scheduling that belongs to the visible info message
    auto_hide_handle: Option<ScheduleHandle>,
    display_for: Duration,
    listeners: Vec<NotificationListener>,
}

impl<A: fmt::Debug> fmt::Debug for NotificationCenter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("auto_hide", &self.auto_hide)
            .field("auto_hide_handle", &self.auto_hide_handle)
            .field("display_for", &self.display_for)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<A> Default for NotificationCenter<A> {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_NOTIFICATION_SECS))
    }
}

impl<A> NotificationCenter<A> {
    pub fn new(display_for: Duration) -> Self {
        Self {
            state: NotificationState::Idle,
            pending: None,
            auto_hide: OneShot::new(),
            auto_hide_handle: None,
            display_for,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(NotificationEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.state, NotificationState::ShowingConfirm(_))
    }

    pub fn info_message(&self) -> Option<&str> {
        match &self.state {
            NotificationState::ShowingInfo(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn confirmation_message(&self) -> Option<&str> {
        match &self.state {
            NotificationState::ShowingConfirm(msg) => Some(msg),
            _ => None,
        }
    }

    /// Show an info message and (re)start its auto-hide countdown.
    /// A visible confirmation is dismissed; its actions are dropped unused.
    pub fn show_notification(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        debug!(%message, "notification");

        self.cancel_auto_hide();
        if self.is_confirming() {
            self.pending = None;
            self.publish(NotificationEvent::ConfirmHidden);
        }
        self.state = NotificationState::ShowingInfo(message);
        self.auto_hide_handle = Some(self.auto_hide.schedule(now, self.display_for));
        self.publish(NotificationEvent::InfoShown);
    }

    /// Ask a yes/no question. Replaces any pending confirmation without
    /// running its actions, and hides any info message.
    pub fn show_confirmation(&mut self, message: impl Into<String>, on_confirm: A, on_cancel: Option<A>) {
        let message = message.into();
        debug!(%message, replaced = self.pending.is_some(), "confirmation requested");

        self.cancel_auto_hide();
        if matches!(self.state, NotificationState::ShowingInfo(_)) {
            self.publish(NotificationEvent::InfoHidden);
        }
        self.pending = Some(PendingConfirmation { on_confirm, on_cancel });
        self.state = NotificationState::ShowingConfirm(message);
        self.publish(NotificationEvent::ConfirmShown);
    }

    /// Accept the pending confirmation, returning its confirm action
    pub fn confirm(&mut self) -> Option<A> {
        if !self.is_confirming() {
            return None;
        }
        let pending = self.take_confirmation();
        pending.map(|p| p.on_confirm)
    }

    /// Decline the pending confirmation, returning its cancel action (if any)
    pub fn cancel(&mut self) -> Option<A> {
        self.clear_confirmation()
    }

    /// Dismiss the pending confirmation as declined
    pub fn clear_confirmation(&mut self) -> Option<A> {
        if !self.is_confirming() {
            return None;
        }
        let pending = self.take_confirmation();
        pending.and_then(|p| p.on_cancel)
    }

    /// Revert an expired info message to idle. Returns true if it did.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(fired) = self.auto_hide.poll(now) else {
            return false;
        };
        if self.auto_hide_handle != Some(fired) {
            return false;
        }
        self.auto_hide_handle = None;
        if matches!(self.state, NotificationState::ShowingInfo(_)) {
            self.state = NotificationState::Idle;
            self.publish(NotificationEvent::InfoHidden);
            return true;
        }
        false
    }

    fn cancel_auto_hide(&mut self) {
        if let Some(handle) = self.auto_hide_handle.take() {
            self.auto_hide.cancel_handle(handle);
        }
    }

    fn take_confirmation(&mut self) -> Option<PendingConfirmation<A>> {
        self.state = NotificationState::Idle;
        let pending = self.pending.take();
        self.publish(NotificationEvent::ConfirmHidden);
        pending
    }

    fn publish(&mut self, event: NotificationEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        ConfirmA,
        CancelA,
        ConfirmB,
        CancelB,
    }

    fn center() -> NotificationCenter<Action> {
        NotificationCenter::new(Duration::from_secs(3))
    }

    #[test]
    fn test_starts_idle() {
        let center = center();
        assert_eq!(center.state(), &NotificationState::Idle);
        assert_eq!(center.info_message(), None);
        assert_eq!(center.confirmation_message(), None);
    }

    #[test]
    fn test_notification_auto_reverts() {
        let t0 = Instant::now();
        let mut center = center();

        center.show_notification("Task added.", t0);
        assert_eq!(center.info_message(), Some("Task added."));

        assert!(!center.poll(t0 + Duration::from_secs(2)));
        assert_eq!(center.info_message(), Some("Task added."));

        assert!(center.poll(t0 + Duration::from_secs(3)));
        assert_eq!(center.state(), &NotificationState::Idle);
    }

    #[test]
    fn test_superseding_notification_restarts_countdown() {
        let t0 = Instant::now();
        let mut center = center();

        center.show_notification("first", t0);
        center.show_notification("second", t0 + Duration::from_secs(2));

        // The first deadline was cancelled
        assert!(!center.poll(t0 + Duration::from_secs(3)));
        assert_eq!(center.info_message(), Some("second"));
        assert!(center.poll(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_confirmation_hides_info_and_survives_its_deadline() {
        let t0 = Instant::now();
        let mut center = center();

        center.show_notification("info", t0);
        center.show_confirmation("Delete?", Action::ConfirmA, None);

        assert_eq!(center.info_message(), None);
        assert_eq!(center.confirmation_message(), Some("Delete?"));
        assert!(!center.poll(t0 + Duration::from_secs(10)));
        assert!(center.is_confirming());
    }

    #[test]
    fn test_confirm_returns_action_and_goes_idle() {
        let mut center = center();
        center.show_confirmation("Delete?", Action::ConfirmA, Some(Action::CancelA));

        assert_eq!(center.confirm(), Some(Action::ConfirmA));
        assert_eq!(center.state(), &NotificationState::Idle);
        // Nothing left to confirm
        assert_eq!(center.confirm(), None);
        assert_eq!(center.cancel(), None);
    }

    #[test]
    fn test_cancel_returns_cancel_action_when_present() {
        let mut center = center();
        center.show_confirmation("Delete?", Action::ConfirmA, Some(Action::CancelA));
        assert_eq!(center.cancel(), Some(Action::CancelA));
        assert_eq!(center.state(), &NotificationState::Idle);

        center.show_confirmation("Reset?", Action::ConfirmB, None);
        assert_eq!(center.clear_confirmation(), None);
        assert_eq!(center.state(), &NotificationState::Idle);
    }

    #[test]
    fn test_replaced_confirmation_is_never_invoked() {
        let mut center = center();
        center.show_confirmation("A?", Action::ConfirmA, Some(Action::CancelA));
        center.show_confirmation("B?", Action::ConfirmB, Some(Action::CancelB));

        assert_eq!(center.confirmation_message(), Some("B?"));
        assert_eq!(center.confirm(), Some(Action::ConfirmB));

        center.show_confirmation("A?", Action::ConfirmA, Some(Action::CancelA));
        center.show_confirmation("B?", Action::ConfirmB, Some(Action::CancelB));
        assert_eq!(center.cancel(), Some(Action::CancelB));
    }

    #[test]
    fn test_notification_drops_pending_confirmation() {
        let t0 = Instant::now();
        let mut center = center();
        center.show_confirmation("A?", Action::ConfirmA, Some(Action::CancelA));
        center.show_notification("Saved.", t0);

        assert!(!center.is_confirming());
        assert_eq!(center.confirm(), None);
        assert_eq!(center.cancel(), None);
        assert_eq!(center.info_message(), Some("Saved."));
    }

    #[test]
    fn test_confirm_while_showing_info_keeps_info() {
        let t0 = Instant::now();
        let mut center = center();
        center.show_notification("info", t0);

        assert_eq!(center.confirm(), None);
        assert_eq!(center.info_message(), Some("info"));
    }

    #[test]
    fn test_listeners_see_visibility_changes() {
        let t0 = Instant::now();
        let mut center = center();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        center.subscribe(move |event| sink.borrow_mut().push(event));

        center.show_notification("info", t0);
        center.show_confirmation("Delete?", Action::ConfirmA, None);
        center.confirm();
        center.show_notification("done", t0);
        center.poll(t0 + Duration::from_secs(3));

        assert_eq!(
            *seen.borrow(),
            vec![
                NotificationEvent::InfoShown,
                NotificationEvent::InfoHidden,
                NotificationEvent::ConfirmShown,
                NotificationEvent::ConfirmHidden,
                NotificationEvent::InfoShown,
                NotificationEvent::InfoHidden,
            ]
        );
    }
}
