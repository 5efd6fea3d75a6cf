#![forbid(unsafe_code)]

//! One-shot deferred tasks.
//!
//! Tips wait a short, fixed delay before watching their visibility flag so
//! their surface can finish mounting. Nothing here polls on its own: the
//! host drives [`ManualScheduler::advance`] (deterministic, used in tests
//! and replay) or [`RealtimeScheduler::poll`] (wall clock) from its event
//! loop.
//!
//! # Invariants
//!
//! 1. A task runs at most once, never before its due time.
//! 2. Due tasks run in due-time order; ties run in scheduling order.
//! 3. A cancelled task never runs.
//! 4. Tasks may schedule or cancel other tasks while running.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use tracing::trace;
use web_time::Instant;

/// Deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Runs tasks once after a delay.
pub trait Scheduler {
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerId;

    /// Returns `false` if the task already ran or was cancelled.
    fn cancel(&self, id: TimerId) -> bool;
}

struct Pending {
    id: TimerId,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct TimerQueue {
    next_id: Cell<u64>,
    pending: RefCell<Vec<Pending>>,
}

impl TimerQueue {
    fn push(&self, due: Duration, task: Task) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.pending.borrow_mut().push(Pending { id, due, task });
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|p| p.id != id);
        pending.len() != before
    }

    fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    fn take_next_due(&self, now: Duration) -> Option<Pending> {
        let mut pending = self.pending.borrow_mut();
        let index = pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| (p.due, p.id.0))
            .map(|(i, _)| i)?;
        Some(pending.remove(index))
    }

    fn run_due(&self, now: Duration) -> usize {
        let mut ran = 0;
        // The borrow is released before each task runs.
        while let Some(next) = self.take_next_due(now) {
            trace!(timer = next.id.0, due_ms = next.due.as_millis() as u64, "timer fired");
            (next.task)();
            ran += 1;
        }
        ran
    }
}

/// Scheduler on a virtual clock advanced by the caller.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    queue: TimerQueue,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.queue.len())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward and run every task that came due. Returns the
    /// number of tasks run.
    pub fn advance(&self, delta: Duration) -> usize {
        let now = self.now.get().saturating_add(delta);
        self.now.set(now);
        self.queue.run_due(now)
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerId {
        self.queue.push(self.now.get().saturating_add(delay), task)
    }

    fn cancel(&self, id: TimerId) -> bool {
        self.queue.cancel(id)
    }
}

/// Scheduler on the wall clock, polled by the host event loop.
pub struct RealtimeScheduler {
    start: Instant,
    queue: TimerQueue,
}

impl Default for RealtimeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RealtimeScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeScheduler")
            .field("elapsed", &self.start.elapsed())
            .field("pending", &self.queue.len())
            .finish()
    }
}

impl RealtimeScheduler {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            queue: TimerQueue::default(),
        }
    }

    /// Run every task that is due now. Returns the number of tasks run.
    pub fn poll(&self) -> usize {
        self.queue.run_due(self.start.elapsed())
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Scheduler for RealtimeScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerId {
        self.queue
            .push(self.start.elapsed().saturating_add(delay), task)
    }

    fn cancel(&self, id: TimerId) -> bool {
        self.queue.cancel(id)
    }
}
