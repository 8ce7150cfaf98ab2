//! Memo Implementation
//!
//! A Memo is the derived, read-only reactive cell: a cached value that
//! re-evaluates only when a dependency changed.
//!
//! # How Memos Work
//!
//! 1. On first access, the memo runs its computation inside a tracking
//!    context and caches the result together with the signal ids it read.
//!
//! 2. When any of those signals changes, the runtime marks the memo
//!    "maybe dirty". Nothing is recomputed yet.
//!
//! 3. On the next access, a dirty memo recomputes; a clean memo returns
//!    the cached value. Memos that are never read again do no work.
//!
//! Reading a memo has no side effects outside the reactive graph, and
//! recomputation is idempotent for unchanged inputs.
//!
//! # Dependency Flattening
//!
//! When a memo is read inside another tracking computation, it re-exports
//! its own signal dependencies to that outer computation. Invalidation
//! therefore flows from signals to every transitive reader without memos
//! needing a push channel of their own: a signal write marks the whole
//! chain, and each layer recomputes lazily on its next read.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use smallvec::SmallVec;

use super::context::TrackingContext;
use super::runtime::{Reactive, ReactiveHandle, Runtime};
use super::subscriber::SubscriberId;

static MEMO_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_memo_id() -> u64 {
    MEMO_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Dirty state for a memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoState {
    /// The cached value is up-to-date.
    Clean,

    /// A dependency changed since the last computation.
    MaybeDirty,

    /// The memo has never computed, or was explicitly invalidated.
    Dirty,
}

struct MemoCore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Unique identifier for this memo.
    id: u64,

    /// The subscriber id used for dependency tracking.
    subscriber_id: SubscriberId,

    /// The computation function.
    compute: Box<dyn Fn() -> T + Send + Sync>,

    /// The cached value (`None` if never computed).
    value: RwLock<Option<T>>,

    /// Current dirty state.
    state: RwLock<MemoState>,

    /// Signal ids read during the last computation, in read order.
    dependencies: RwLock<SmallVec<[u64; 8]>>,
}

impl<T> MemoCore<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn recompute(&self) -> T {
        // Drop edges from the previous run so stale signals stop
        // invalidating this memo.
        Runtime::clear_dependencies(self.subscriber_id);

        let new_value = {
            let _ctx = TrackingContext::enter(self.subscriber_id);
            let value = (self.compute)();

            let deps: SmallVec<[u64; 8]> =
                TrackingContext::collected_dependencies().into_iter().collect();
            *self.dependencies.write() = deps;

            value
        };

        *self.value.write() = Some(new_value.clone());
        *self.state.write() = MemoState::Clean;

        new_value
    }
}

impl<T> Reactive for MemoCore<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn mark_maybe_dirty(&self) {
        let mut state = self.state.write();
        if *state == MemoState::Clean {
            *state = MemoState::MaybeDirty;
        }
    }

    fn run(&self) {
        // Memos are lazy; they recompute on next read.
    }

    fn is_eager(&self) -> bool {
        false
    }
}

/// A derived reactive cell that recomputes only when dependencies change.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(2);
/// let count2 = count.clone();
/// let doubled = Memo::new(move || count2.get() * 2);
///
/// assert_eq!(doubled.get(), 4);
/// count.set(5);
/// assert_eq!(doubled.get(), 10);
/// ```
pub struct Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    core: Arc<MemoCore<T>>,

    /// Keeps the memo registered with the runtime; unregisters when the
    /// last clone drops.
    _registration: Arc<ReactiveHandle>,
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new memo with the given computation function.
    ///
    /// The computation does not run immediately; it runs on first access.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let core = Arc::new(MemoCore {
            id: next_memo_id(),
            subscriber_id: SubscriberId::new(),
            compute: Box::new(compute),
            value: RwLock::new(None),
            state: RwLock::new(MemoState::Dirty),
            dependencies: RwLock::new(SmallVec::new()),
        });

        let registration = Runtime::register(core.clone() as Arc<dyn Reactive>);

        Self {
            core,
            _registration: Arc::new(registration),
        }
    }

    /// The memo's unique id.
    pub fn id(&self) -> u64 {
        self.core.id
    }

    /// The subscriber id for this memo.
    pub fn subscriber_id(&self) -> SubscriberId {
        self.core.subscriber_id
    }

    /// Get the current value, recomputing if a dependency changed.
    pub fn get(&self) -> T {
        let state = *self.core.state.read();

        let value = match state {
            MemoState::Clean => self
                .core
                .value
                .read()
                .clone()
                .expect("clean memo holds a value"),
            MemoState::MaybeDirty | MemoState::Dirty => self.core.recompute(),
        };

        // Re-export this memo's signal dependencies to the enclosing
        // computation, so a change to any underlying signal also
        // invalidates the outer reader.
        if TrackingContext::is_tracking() {
            if let Some(outer) = TrackingContext::current_subscriber() {
                for dep in self.core.dependencies.read().iter() {
                    TrackingContext::track_dependency(*dep);
                    Runtime::add_dependency(*dep, outer);
                }
            }
        }

        value
    }

    /// Get the current value without establishing a dependency for the
    /// enclosing computation.
    pub fn get_untracked(&self) -> T {
        super::context::untracked(|| self.get())
    }

    /// The current dirty state.
    pub fn state(&self) -> MemoState {
        *self.core.state.read()
    }

    /// Whether the memo has computed at least once.
    pub fn has_value(&self) -> bool {
        self.core.value.read().is_some()
    }
}

impl<T> Clone for Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            _registration: Arc::clone(&self._registration),
        }
    }
}

impl<T> Debug for Memo<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("id", &self.core.id)
            .field("state", &self.state())
            .field("has_value", &self.has_value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Signal;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn memo_computes_on_first_access() {
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let memo = Memo::new(move || {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            42
        });

        assert!(!memo.has_value());
        assert_eq!(call_count.load(Ordering::SeqCst), 0);

        assert_eq!(memo.get(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(memo.has_value());
    }

    #[test]
    fn memo_caches_value_when_clean() {
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let memo = Memo::new(move || {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            42
        });

        assert_eq!(memo.get(), 42);
        assert_eq!(memo.get(), 42);
        assert_eq!(memo.get(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn memo_recomputes_after_signal_change() {
        let signal = Signal::new(10);
        let signal_clone = signal.clone();

        let memo = Memo::new(move || signal_clone.get() * 2);
        assert_eq!(memo.get(), 20);
        assert_eq!(memo.state(), MemoState::Clean);

        signal.set(5);
        assert_eq!(memo.state(), MemoState::MaybeDirty);

        assert_eq!(memo.get(), 10);
        assert_eq!(memo.state(), MemoState::Clean);
    }

    #[test]
    fn memo_does_not_recompute_for_unrelated_signal() {
        let tracked = Signal::new(1);
        let unrelated = Signal::new(1);

        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();
        let tracked_clone = tracked.clone();

        let memo = Memo::new(move || {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            tracked_clone.get()
        });

        assert_eq!(memo.get(), 1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        unrelated.set(99);
        assert_eq!(memo.get(), 1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn memo_depends_on_memo() {
        let base = Signal::new(5);
        let base_clone = base.clone();

        let doubled = Memo::new(move || base_clone.get() * 2);
        let doubled_clone = doubled.clone();
        let plus_ten = Memo::new(move || doubled_clone.get() + 10);

        assert_eq!(doubled.get(), 10);
        assert_eq!(plus_ten.get(), 20);

        base.set(10);

        assert_eq!(doubled.get(), 20);
        assert_eq!(plus_ten.get(), 30);
    }

    #[test]
    fn memo_get_untracked_registers_no_edge() {
        let signal = Signal::new(1);
        let signal_clone = signal.clone();
        let inner = Memo::new(move || signal_clone.get());

        let inner_clone = inner.clone();
        let outer = Memo::new(move || inner_clone.get_untracked());

        assert_eq!(outer.get(), 1);

        // The outer memo peeked, so the signal change must not reach it.
        signal.set(2);
        assert_eq!(outer.state(), MemoState::Clean);
        assert_eq!(outer.get(), 1);
    }

    #[test]
    fn memo_clone_shares_state() {
        let memo1 = Memo::new(|| 42);
        assert_eq!(memo1.get(), 42);

        let memo2 = memo1.clone();
        assert_eq!(memo1.id(), memo2.id());
        assert!(memo2.has_value());
        assert_eq!(memo2.get(), 42);
    }

    #[test]
    fn idempotent_reads() {
        let signal = Signal::new(3);
        let signal_clone = signal.clone();
        let memo = Memo::new(move || signal_clone.get() + 1);

        let first = memo.get();
        let second = memo.get();
        assert_eq!(first, second);
    }
}
