//! Deferred-work Scheduler
//!
//! Timing operators need two host services: one-shot timers (debounce's
//! delay window) and a microtask queue (deferring a write onto a
//! consistent batch boundary). This scheduler provides both behind a
//! cloneable handle, driven by virtual time: nothing fires until the
//! owner calls [`Scheduler::advance`] or [`Scheduler::flush`].
//!
//! Virtual time keeps every timing test deterministic and keeps the
//! library from spawning any execution context of its own; the embedding
//! application decides when time moves.
//!
//! # Ordering
//!
//! Timers fire in (deadline, schedule-sequence) order. After each timer
//! fires, queued microtasks are drained, so a write deferred from inside
//! a timer callback lands before the next timer runs.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

type Task = Box<dyn FnOnce() + Send>;

/// (deadline, sequence); the sequence breaks ties between timers
/// scheduled for the same instant.
type TimerKey = (Duration, u64);

struct SchedulerState {
    now: Duration,
    next_seq: u64,
    timers: BTreeMap<TimerKey, Task>,
    microtasks: VecDeque<Task>,
}

/// A virtual-time timer and microtask queue.
///
/// Cloning produces another handle to the same queue.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Mutex<SchedulerState>>,
}

/// Handle to a pending timer. Cancelling a fired or already-cancelled
/// timer is a no-op.
pub struct TimerHandle {
    key: TimerKey,
    scheduler: Weak<Mutex<SchedulerState>>,
}

impl TimerHandle {
    /// Cancel the timer if it has not fired yet.
    pub fn cancel(&self) {
        if let Some(inner) = self.scheduler.upgrade() {
            inner.lock().timers.remove(&self.key);
        }
    }
}

impl Scheduler {
    /// Create a new scheduler at virtual time zero.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerState {
                now: Duration::ZERO,
                next_seq: 0,
                timers: BTreeMap::new(),
                microtasks: VecDeque::new(),
            })),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Schedule `f` to run once, `delay` from now.
    pub fn schedule(&self, delay: Duration, f: impl FnOnce() + Send + 'static) -> TimerHandle {
        let mut state = self.inner.lock();
        let key = (state.now + delay, state.next_seq);
        state.next_seq += 1;
        state.timers.insert(key, Box::new(f));

        TimerHandle {
            key,
            scheduler: Arc::downgrade(&self.inner),
        }
    }

    /// Queue `f` on the microtask queue, to run at the next flush point.
    pub fn defer(&self, f: impl FnOnce() + Send + 'static) {
        self.inner.lock().microtasks.push_back(Box::new(f));
    }

    /// Drain the microtask queue, including tasks queued while draining.
    pub fn flush(&self) {
        loop {
            // Take one task at a time so a task that defers more work
            // keeps FIFO order, and so no lock is held while it runs.
            let task = self.inner.lock().microtasks.pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }

    /// Advance virtual time by `dt`, firing due timers in order and
    /// draining microtasks after each.
    pub fn advance(&self, dt: Duration) {
        let target = self.inner.lock().now + dt;

        loop {
            let due = {
                let mut state = self.inner.lock();
                let next = state
                    .timers
                    .first_key_value()
                    .map(|(&key, _)| key)
                    .filter(|&(deadline, _)| deadline <= target);
                match next {
                    Some(key) => {
                        state.now = key.0;
                        state.timers.remove(&key)
                    }
                    None => None,
                }
            };

            match due {
                Some(task) => {
                    trace!("timer fired");
                    task();
                    self.flush();
                }
                None => break,
            }
        }

        self.inner.lock().now = target;
        self.flush();
    }

    /// Number of timers not yet fired or cancelled.
    pub fn pending_timers(&self) -> usize {
        self.inner.lock().timers.len()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn timer_fires_after_advance() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicI32::new(0));

        let fired_clone = fired.clone();
        scheduler.schedule(Duration::from_millis(100), move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        scheduler.advance(Duration::from_millis(90));
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        scheduler.advance(Duration::from_millis(20));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let scheduler = Scheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for (delay, tag) in [(30u64, "c"), (10, "a"), (20, "b")] {
            let order = order.clone();
            scheduler.schedule(Duration::from_millis(delay), move || {
                order.lock().push(tag);
            });
        }

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(*order.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn same_deadline_fires_in_schedule_order() {
        let scheduler = Scheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = order.clone();
            scheduler.schedule(Duration::from_millis(10), move || {
                order.lock().push(tag);
            });
        }

        scheduler.advance(Duration::from_millis(10));
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn cancelled_timer_does_not_fire() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicI32::new(0));

        let fired_clone = fired.clone();
        let handle = scheduler.schedule(Duration::from_millis(10), move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        handle.cancel();
        scheduler.advance(Duration::from_millis(20));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn microtasks_drain_in_fifo_order() {
        let scheduler = Scheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in [1, 2, 3] {
            let order = order.clone();
            scheduler.defer(move || order.lock().push(tag));
        }

        scheduler.flush();
        assert_eq!(*order.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn microtask_queued_by_timer_runs_within_advance() {
        let scheduler = Scheduler::new();
        let done = Arc::new(AtomicI32::new(0));

        let sched = scheduler.clone();
        let done_clone = done.clone();
        scheduler.schedule(Duration::from_millis(5), move || {
            let done_clone = done_clone.clone();
            sched.defer(move || {
                done_clone.fetch_add(1, Ordering::SeqCst);
            });
        });

        scheduler.advance(Duration::from_millis(5));
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn virtual_time_accumulates() {
        let scheduler = Scheduler::new();
        scheduler.advance(Duration::from_millis(40));
        scheduler.advance(Duration::from_millis(60));
        assert_eq!(scheduler.now(), Duration::from_millis(100));
    }
}
