//! Signal Implementation
//!
//! A Signal is the mutable reactive cell. It holds a current value and
//! tracks which computations depend on it.
//!
//! # How Signals Work
//!
//! 1. When a signal is read within a tracking context (memo/effect), the
//!    runtime records that context as a subscriber.
//!
//! 2. When the signal's value changes, the runtime marks dependent memos
//!    for lazy recomputation and runs dependent effects synchronously.
//!
//! Reading a signal outside any tracking context is just a read.
//!
//! # Identity
//!
//! A signal's identity is its `u64` id, stable for its whole lifetime.
//! `Clone` produces another handle to the same cell: both see the same
//! value and the same subscribers.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use super::context::TrackingContext;
use super::runtime::Runtime;

static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A mutable reactive cell holding a value of type `T`.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(0);
///
/// let value = count.get();
///
/// count.set(5); // dependents are notified
/// ```
pub struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Unique identifier for this signal.
    id: u64,

    /// The current value.
    value: Arc<RwLock<T>>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            id: next_signal_id(),
            value: Arc::new(RwLock::new(value)),
        }
    }

    /// The signal's unique id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value.
    ///
    /// If called within a tracking context, the current computation is
    /// registered as a subscriber of this signal.
    pub fn get(&self) -> T {
        if TrackingContext::is_tracking() {
            TrackingContext::track_dependency(self.id);
            if let Some(subscriber_id) = TrackingContext::current_subscriber() {
                Runtime::add_dependency(self.id, subscriber_id);
            }
        }

        self.value.read().clone()
    }

    /// Get the current value without establishing a dependency.
    pub fn get_untracked(&self) -> T {
        self.value.read().clone()
    }

    /// Set a new value and notify subscribers.
    ///
    /// Dependent effects run synchronously before this returns; dependent
    /// memos recompute lazily on their next read.
    ///
    /// Notification is unconditional: writing a value equal to the current
    /// one still counts as a change and fires dependent effects.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.value.write();
            *guard = value;
        }

        trace!(signal_id = self.id, "signal set");
        Runtime::notify_signal_change(self.id);
    }

    /// Update the value using a function of the current value.
    ///
    /// The current value is read without tracking, so calling `update`
    /// inside an effect does not make the effect depend on this signal.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = {
            let guard = self.value.read();
            f(&guard)
        };
        self.set(new_value);
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> Drop for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        // Last handle: the cell can never be set again, so its registry
        // entry is dead weight.
        if Arc::strong_count(&self.value) == 1 {
            Runtime::remove_signal(self.id);
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.get_untracked())
            .finish()
    }
}
