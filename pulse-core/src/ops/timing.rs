//! Timing operators.
//!
//! debounce and sample bridge scheduler- and trigger-driven events back
//! into the synchronous reactive graph. Each allocates a private output
//! signal and a bridging effect; the effect is owned by the scope active
//! at construction time, so disposing that scope tears the operator down.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::reactive::{Effect, Signal, Source};
use crate::scheduler::{Scheduler, TimerHandle};

/// Derive a cell that follows the source only after it has been stable
/// for `delay`.
///
/// Every source change cancels the pending timer and schedules a new one
/// (last timer wins), so rapid successive changes reset the window. The
/// write itself is deferred through the scheduler's microtask queue so it
/// lands on a consistent batch boundary rather than inside the timer
/// callback.
///
/// The output starts at the source's value at construction time. The
/// bridging effect is owned by the [`Scope`](crate::reactive::Scope)
/// active at construction time; dispose that scope to tear the operator
/// down. Built outside any scope, it lives until process teardown.
pub fn debounce<T>(
    source: impl Into<Source<T>>,
    delay: Duration,
    scheduler: &Scheduler,
) -> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    let source = source.into();
    let output = Signal::new(source.get_untracked());

    let scheduler = scheduler.clone();
    let pending: Arc<Mutex<Option<TimerHandle>>> = Arc::new(Mutex::new(None));

    let result = output.clone();
    Effect::new(move || {
        let current = source.get();

        let mut slot = pending.lock();
        if let Some(timer) = slot.take() {
            timer.cancel();
        }

        let result = result.clone();
        let queue = scheduler.clone();
        *slot = Some(scheduler.schedule(delay, move || {
            queue.defer(move || result.set(current));
        }));
    });

    output
}

/// Derive a cell that copies the source's value each time `trigger`
/// changes.
///
/// The bridging effect depends only on the trigger; the source read is a
/// peek, so source changes between trigger ticks are invisible until the
/// next tick. The output starts at the source's value at construction
/// time; for teardown the bridging effect follows the same scope
/// ownership as [`debounce`].
pub fn sample<T, U>(source: impl Into<Source<T>>, trigger: impl Into<Source<U>>) -> Signal<T>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
{
    let source = source.into();
    let trigger = trigger.into();
    let output = Signal::new(source.get_untracked());

    let result = output.clone();
    Effect::new(move || {
        trigger.get();
        result.set(source.get_untracked());
    });

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_starts_at_source_value() {
        let scheduler = Scheduler::new();
        let source = Signal::new(1);
        let debounced = debounce(source, Duration::from_millis(100), &scheduler);

        assert_eq!(debounced.get(), 1);
    }

    #[test]
    fn debounce_settles_after_quiet_window() {
        let scheduler = Scheduler::new();
        let source = Signal::new(1);
        let debounced = debounce(source.clone(), Duration::from_millis(100), &scheduler);

        source.set(2);
        assert_eq!(debounced.get(), 1);

        scheduler.advance(Duration::from_millis(90));
        assert_eq!(debounced.get(), 1);

        scheduler.advance(Duration::from_millis(20));
        assert_eq!(debounced.get(), 2);
    }

    #[test]
    fn rapid_changes_reset_the_window() {
        let scheduler = Scheduler::new();
        let source = Signal::new(0);
        let debounced = debounce(source.clone(), Duration::from_millis(100), &scheduler);

        source.set(1);
        scheduler.advance(Duration::from_millis(60));
        source.set(2);
        scheduler.advance(Duration::from_millis(60));
        source.set(3);

        // 120ms elapsed but never 100ms of quiet: still the initial value.
        assert_eq!(debounced.get(), 0);

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(debounced.get(), 3);
    }

    #[test]
    fn debounce_output_is_writable_between_windows() {
        let scheduler = Scheduler::new();
        let source = Signal::new(1);
        let debounced = debounce(source, Duration::from_millis(10), &scheduler);

        // The output is a plain mutable cell; direct writes are allowed.
        debounced.set(99);
        assert_eq!(debounced.get(), 99);
    }

    #[test]
    fn sample_starts_at_source_value() {
        let source = Signal::new(10);
        let trigger = Signal::new(false);
        let sampled = sample(source, trigger);

        assert_eq!(sampled.get(), 10);
    }

    #[test]
    fn sample_copies_source_on_trigger_only() {
        let source = Signal::new(10);
        let trigger = Signal::new(false);
        let sampled = sample(source.clone(), trigger.clone());

        // Source moves before the trigger fires: output holds still.
        source.set(20);
        assert_eq!(sampled.get(), 10);

        trigger.set(true);
        assert_eq!(sampled.get(), 20);
    }

    #[test]
    fn sample_ignores_interim_source_changes() {
        let source = Signal::new(0);
        let trigger = Signal::new(0);
        let sampled = sample(source.clone(), trigger.clone());

        source.set(1);
        source.set(2);
        source.set(3);
        assert_eq!(sampled.get(), 0);

        trigger.set(1);
        assert_eq!(sampled.get(), 3);
    }

    #[test]
    fn sample_does_not_depend_on_source() {
        let source = Signal::new(0);
        let trigger = Signal::new(0);
        let sampled = sample(source.clone(), trigger.clone());

        // Many source changes without a trigger tick: the bridging effect
        // must not have fired for any of them.
        for n in 1..=5 {
            source.set(n);
        }
        assert_eq!(sampled.get(), 0);

        trigger.set(1);
        assert_eq!(sampled.get(), 5);
    }
}
