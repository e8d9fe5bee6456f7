//! Delayed actions with an injectable clock.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guard redirects and notice dismissal run after a fixed delay. They go
//! through [`Scheduler`] so the browser can use real timers while tests and
//! the CLI drive a [`VirtualClock`] by hand.
//!
//! DESIGN
//! ======
//! A [`ScheduledTask`] is a shared flag pair. Cancelling flips the flag and
//! the scheduler skips the action when its time comes; the timer itself is
//! left to expire.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub type Action = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Run `action` once after `delay`, unless the returned task is cancelled first.
    fn schedule(&self, delay: Duration, action: Action) -> ScheduledTask;
}

/// Handle to an action scheduled on a [`Scheduler`].
#[derive(Debug, Clone, Default)]
pub struct ScheduledTask {
    cancelled: Rc<Cell<bool>>,
    fired: Rc<Cell<bool>>,
}

impl ScheduledTask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prevent the action from running. Returns `false` if it already ran or
    /// was already cancelled.
    pub fn cancel(&self) -> bool {
        if self.fired.get() || self.cancelled.get() {
            return false;
        }
        self.cancelled.set(true);
        true
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.fired.get() && !self.cancelled.get()
    }

    /// Run `action` unless cancelled. Called by scheduler implementations.
    pub fn fire(&self, action: Action) {
        if self.is_pending() {
            self.fired.set(true);
            action();
        }
    }
}

// =============================================================================
// VIRTUAL CLOCK
// =============================================================================

struct Pending {
    due: Duration,
    seq: u64,
    task: ScheduledTask,
    action: Action,
}

/// Deterministic scheduler whose time only moves when told to.
#[derive(Default)]
pub struct VirtualClock {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    queue: RefCell<Vec<Pending>>,
}

impl VirtualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Tasks still waiting to fire (cancelled ones excluded).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().iter().filter(|p| p.task.is_pending()).count()
    }

    /// Move time forward by `by`, firing every task that falls due, in due
    /// order and then scheduling order. Actions may schedule more work; it
    /// fires too if it falls inside the window.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        while let Some(next) = self.pop_due(target) {
            self.now.set(next.due);
            next.task.fire(next.action);
        }
        self.now.set(target);
    }

    /// Fire everything that is queued, however far in the future.
    pub fn run_until_idle(&self) {
        loop {
            let last_due = self.queue.borrow().iter().map(|p| p.due).max();
            match last_due {
                Some(due) => self.advance(due.saturating_sub(self.now.get())),
                None => break,
            }
        }
    }

    fn pop_due(&self, target: Duration) -> Option<Pending> {
        let mut queue = self.queue.borrow_mut();
        let index = queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        Some(queue.remove(index))
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&self, delay: Duration, action: Action) -> ScheduledTask {
        let task = ScheduledTask::new();
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.queue.borrow_mut().push(Pending { due: self.now.get() + delay, seq, task: task.clone(), action });
        task
    }
}

// =============================================================================
// BROWSER TIMERS
// =============================================================================

/// Real-time scheduler on top of `setTimeout`.
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

#[cfg(feature = "hydrate")]
impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, action: Action) -> ScheduledTask {
        let task = ScheduledTask::new();
        let handle = task.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::callback::Timeout::new(millis, move || handle.fire(action)).forget();
        task
    }
}
