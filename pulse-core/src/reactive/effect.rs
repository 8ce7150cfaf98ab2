//! Effect Implementation
//!
//! An Effect is an eager side-effecting computation that re-runs whenever
//! one of its dependencies changes.
//!
//! # How Effects Work
//!
//! 1. When created, the effect runs its function immediately to establish
//!    initial dependencies.
//!
//! 2. When any dependency signal changes, the runtime re-runs the effect
//!    synchronously, in registration order relative to other effects on
//!    the same signal.
//!
//! 3. Before each re-run, the effect clears its old dependency edges and
//!    tracks fresh ones during execution.
//!
//! # Ownership
//!
//! Effects created while a [`Scope`](super::Scope) is active are owned by
//! that scope and stop when the scope is disposed. Effects created outside
//! any scope are owned by the process-wide root scope and run until
//! explicitly disposed.
//!
//! # Differences from Memo
//!
//! - Memos return a value; effects do not.
//! - Memos are lazy (compute on access); effects are eager (run on change).

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::trace;

use super::context::TrackingContext;
use super::runtime::{Reactive, ReactiveHandle, Runtime};
use super::scope;
use super::subscriber::SubscriberId;

static EFFECT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_effect_id() -> u64 {
    EFFECT_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

struct EffectCore {
    /// Unique identifier for this effect.
    id: u64,

    /// The subscriber id used for dependency tracking.
    subscriber_id: SubscriberId,

    /// The effect function.
    run: Box<dyn Fn() + Send + Sync>,

    /// Signal ids read during the last run.
    dependencies: RwLock<SmallVec<[u64; 8]>>,

    /// Whether the effect has been disposed.
    disposed: AtomicBool,

    /// Number of completed runs.
    run_count: AtomicUsize,
}

impl EffectCore {
    fn execute(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }

        Runtime::clear_dependencies(self.subscriber_id);

        {
            let _ctx = TrackingContext::enter(self.subscriber_id);
            (self.run)();

            let deps: SmallVec<[u64; 8]> =
                TrackingContext::collected_dependencies().into_iter().collect();
            *self.dependencies.write() = deps;
        }

        self.run_count.fetch_add(1, Ordering::SeqCst);
        trace!(effect_id = self.id, "effect ran");
    }
}

impl Reactive for EffectCore {
    fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn mark_maybe_dirty(&self) {
        // Effects carry no cached value; re-running is the whole point.
    }

    fn run(&self) {
        self.execute();
    }

    fn is_eager(&self) -> bool {
        true
    }
}

/// A side-effecting computation that re-runs when its dependencies change.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(0);
/// let count2 = count.clone();
///
/// let effect = Effect::new(move || {
///     println!("count is {}", count2.get());
/// });
///
/// count.set(5); // prints "count is 5"
/// ```
pub struct Effect {
    core: Arc<EffectCore>,

    /// Keeps the effect registered with the runtime; unregisters when the
    /// last clone drops.
    _registration: Arc<ReactiveHandle>,
}

impl Effect {
    /// Create a new effect with the given function.
    ///
    /// The function runs immediately to establish initial dependencies,
    /// and the effect is adopted by the currently active scope (or the
    /// root scope when none is active).
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let core = Arc::new(EffectCore {
            id: next_effect_id(),
            subscriber_id: SubscriberId::new(),
            run: Box::new(run),
            dependencies: RwLock::new(SmallVec::new()),
            disposed: AtomicBool::new(false),
            run_count: AtomicUsize::new(0),
        });

        let registration = Runtime::register(core.clone() as Arc<dyn Reactive>);

        let effect = Self {
            core,
            _registration: Arc::new(registration),
        };

        effect.execute();
        scope::adopt(effect.clone());

        effect
    }

    /// The effect's unique id.
    pub fn id(&self) -> u64 {
        self.core.id
    }

    /// The subscriber id for this effect.
    pub fn subscriber_id(&self) -> SubscriberId {
        self.core.subscriber_id
    }

    /// Run the effect function now, re-tracking dependencies.
    pub fn execute(&self) {
        self.core.execute();
    }

    /// Dispose of the effect. After disposal it never runs again.
    pub fn dispose(&self) {
        self.core.disposed.store(true, Ordering::SeqCst);
        Runtime::clear_dependencies(self.core.subscriber_id);
    }

    /// Whether the effect has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.core.disposed.load(Ordering::SeqCst)
    }

    /// Number of completed runs.
    pub fn run_count(&self) -> usize {
        self.core.run_count.load(Ordering::SeqCst)
    }

    /// Number of signals the effect currently depends on.
    pub fn dependency_count(&self) -> usize {
        self.core.dependencies.read().len()
    }
}

impl Clone for Effect {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            _registration: Arc::clone(&self._registration),
        }
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.core.id)
            .field("run_count", &self.run_count())
            .field("dependency_count", &self.dependency_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Signal;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn effect_runs_on_creation() {
        let run_count = Arc::new(AtomicI32::new(0));
        let run_count_clone = run_count.clone();

        let _effect = Effect::new(move || {
            run_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(run_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn effect_reruns_on_signal_change() {
        let signal = Signal::new(0);
        let observed = Arc::new(AtomicI32::new(-1));

        let signal_clone = signal.clone();
        let observed_clone = observed.clone();
        let effect = Effect::new(move || {
            observed_clone.store(signal_clone.get(), Ordering::SeqCst);
        });

        assert_eq!(observed.load(Ordering::SeqCst), 0);
        assert_eq!(effect.dependency_count(), 1);

        signal.set(42);
        assert_eq!(observed.load(Ordering::SeqCst), 42);
        assert_eq!(effect.run_count(), 2);
    }

    #[test]
    fn effect_does_not_run_after_disposal() {
        let signal = Signal::new(0);
        let run_count = Arc::new(AtomicI32::new(0));

        let signal_clone = signal.clone();
        let run_count_clone = run_count.clone();
        let effect = Effect::new(move || {
            signal_clone.get();
            run_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(run_count.load(Ordering::SeqCst), 1);

        effect.dispose();
        assert!(effect.is_disposed());

        signal.set(1);
        signal.set(2);
        assert_eq!(run_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn effect_retracks_dependencies_each_run() {
        let gate = Signal::new(true);
        let a = Signal::new(1);
        let b = Signal::new(10);
        let observed = Arc::new(AtomicI32::new(0));

        let (gate2, a2, b2, observed2) = (gate.clone(), a.clone(), b.clone(), observed.clone());
        let _effect = Effect::new(move || {
            let value = if gate2.get() { a2.get() } else { b2.get() };
            observed2.store(value, Ordering::SeqCst);
        });

        assert_eq!(observed.load(Ordering::SeqCst), 1);

        // While the gate selects `a`, changes to `b` are invisible.
        b.set(20);
        assert_eq!(observed.load(Ordering::SeqCst), 1);

        gate.set(false);
        assert_eq!(observed.load(Ordering::SeqCst), 20);

        // After the switch, changes to `a` are invisible.
        a.set(5);
        assert_eq!(observed.load(Ordering::SeqCst), 20);

        b.set(30);
        assert_eq!(observed.load(Ordering::SeqCst), 30);
    }

    #[test]
    fn effect_clone_shares_state() {
        let effect1 = Effect::new(|| {});
        let effect2 = effect1.clone();

        assert_eq!(effect1.id(), effect2.id());
        assert_eq!(effect1.run_count(), 1);
        assert_eq!(effect2.run_count(), 1);

        effect1.execute();
        assert_eq!(effect2.run_count(), 2);

        effect1.dispose();
        assert!(effect2.is_disposed());
    }
}
