use std::time::{Duration, Instant};

/// Default event-poll interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Default display clock period in milliseconds
pub const DEFAULT_CLOCK_MS: u64 = 1000;

/// Recurring clock polled by the event loop.
///
/// Fires at most once per poll; missed periods are skipped rather than
/// replayed, so a stalled loop does not produce a burst of ticks.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Start (or restart) the clock; the first tick is one period after `now`
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Returns true if a tick is due at `now`
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let mut next = due + self.period;
        while next <= now {
            next += self.period;
        }
        self.next_due = Some(next);
        true
    }
}

/// Identifies one scheduling of a [`OneShot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleHandle(u64);

/// A single cancellable delayed action slot.
///
/// Scheduling again replaces whatever was pending, so at most one deadline
/// exists per slot.
#[derive(Debug, Clone, Default)]
pub struct OneShot {
    generation: u64,
    pending: Option<(ScheduleHandle, Instant)>,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the slot to fire `delay` after `now`, cancelling any pending one
    pub fn schedule(&mut self, now: Instant, delay: Duration) -> ScheduleHandle {
        self.generation += 1;
        let handle = ScheduleHandle(self.generation);
        self.pending = Some((handle, now + delay));
        handle
    }

    /// Cancel only if `handle` is still the pending scheduling
    pub fn cancel_handle(&mut self, handle: ScheduleHandle) -> bool {
        match self.pending {
            Some((pending, _)) if pending == handle => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Fire the slot if its deadline has passed. Fires once per scheduling.
    pub fn poll(&mut self, now: Instant) -> Option<ScheduleHandle> {
        match self.pending {
            Some((handle, at)) if now >= at => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }
}
