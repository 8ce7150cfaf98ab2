//! Reactive Runtime
//!
//! The runtime is the central coordinator that connects signals, memos, and
//! effects. It owns the global dependency registries and drives invalidation
//! when a signal changes.
//!
//! # How It Works
//!
//! 1. When a memo or effect is created, it registers with the runtime.
//!
//! 2. When a computation reads a signal, the runtime records the edge from
//!    the signal to the computation's subscriber id.
//!
//! 3. When a signal's value changes, the runtime:
//!    a. Finds the subscribers recorded for that signal, in the order they
//!       first read it (registration order, stable)
//!    b. Marks each as "maybe dirty"
//!    c. Runs eager subscribers (effects) synchronously, in that order
//!    d. Lazy subscribers (memos) recompute on their next read
//!
//! One `set` call is one propagation batch: all effects observing the
//! changed signal fire before `set` returns, so a derived cell read after
//! the write always sees the effects' output.
//!
//! # Thread Safety
//!
//! The registries are concurrent maps so signals can be shared across
//! threads; the tracking context itself is thread-local, which keeps the
//! common single-threaded case cheap.

use std::sync::{Arc, OnceLock, Weak};

use dashmap::DashMap;
use smallvec::SmallVec;
use tracing::trace;

use super::subscriber::SubscriberId;

/// A type that can be notified when one of its dependencies changes.
pub trait Reactive: Send + Sync {
    /// The subscriber id this reactive value registered under.
    fn subscriber_id(&self) -> SubscriberId;

    /// Mark this reactive value as potentially needing update.
    fn mark_maybe_dirty(&self);

    /// Run this reactive value now (effects only; no-op for memos).
    fn run(&self);

    /// Whether this reactive value is eager (effect) or lazy (memo).
    fn is_eager(&self) -> bool;
}

/// Handle to a registered reactive value.
///
/// Dropping the handle unregisters the value and removes its dependency
/// edges from the runtime.
pub struct ReactiveHandle {
    subscriber_id: SubscriberId,
}

impl Drop for ReactiveHandle {
    fn drop(&mut self) {
        Runtime::unregister(self.subscriber_id);
    }
}

/// The global reactive runtime.
pub struct Runtime;

// Subscriber id -> weak reference, so dropping a memo/effect (and its
// handle) actually releases it.
static REGISTRY: OnceLock<DashMap<SubscriberId, Weak<dyn Reactive>>> = OnceLock::new();

// Signal id -> subscribers in first-read order. The order is load-bearing:
// it is the tie-break for effects firing within one propagation batch.
static SIGNAL_SUBSCRIBERS: OnceLock<DashMap<u64, SmallVec<[SubscriberId; 4]>>> = OnceLock::new();

fn registry() -> &'static DashMap<SubscriberId, Weak<dyn Reactive>> {
    REGISTRY.get_or_init(DashMap::new)
}

fn signal_subscribers() -> &'static DashMap<u64, SmallVec<[SubscriberId; 4]>> {
    SIGNAL_SUBSCRIBERS.get_or_init(DashMap::new)
}

impl Runtime {
    /// Register a reactive value with the runtime.
    ///
    /// Returns a handle that unregisters the value when dropped.
    pub fn register(reactive: Arc<dyn Reactive>) -> ReactiveHandle {
        let id = reactive.subscriber_id();
        registry().insert(id, Arc::downgrade(&reactive));
        ReactiveHandle { subscriber_id: id }
    }

    fn unregister(id: SubscriberId) {
        registry().remove(&id);
        Self::clear_dependencies(id);
    }

    /// Record that a subscriber depends on a signal.
    ///
    /// Called automatically when a signal is read within a tracking
    /// context. Duplicate edges are ignored so a subscriber fires once per
    /// change no matter how many times it read the signal.
    pub fn add_dependency(signal_id: u64, subscriber_id: SubscriberId) {
        let mut subs = signal_subscribers().entry(signal_id).or_default();
        if !subs.contains(&subscriber_id) {
            subs.push(subscriber_id);
        }
    }

    /// Remove all dependency edges for a subscriber.
    ///
    /// Called before a computation re-runs, so stale edges from a previous
    /// run do not keep firing it. Signals whose subscriber list empties are
    /// dropped from the registry entirely, so short-lived cells do not
    /// accumulate dead entries.
    pub fn clear_dependencies(subscriber_id: SubscriberId) {
        signal_subscribers().retain(|_, subs| {
            subs.retain(|s| *s != subscriber_id);
            !subs.is_empty()
        });
    }

    /// Remove a signal's registry entry outright.
    ///
    /// Called when the last handle to a signal drops: the signal can never
    /// be written again, so its remaining edges are dead.
    pub(crate) fn remove_signal(signal_id: u64) {
        signal_subscribers().remove(&signal_id);
    }

    /// Notify all subscribers that a signal changed.
    ///
    /// This is the core update propagation mechanism: memos are marked for
    /// lazy recomputation, effects run synchronously in registration order.
    pub fn notify_signal_change(signal_id: u64) {
        let subscriber_ids: SmallVec<[SubscriberId; 4]> = match signal_subscribers().get(&signal_id)
        {
            Some(subs) => subs.clone(),
            None => return,
        };

        if subscriber_ids.is_empty() {
            return;
        }

        trace!(signal_id, subscribers = subscriber_ids.len(), "signal changed");

        let mut effects_to_run: Vec<Arc<dyn Reactive>> = Vec::new();

        for sub_id in subscriber_ids {
            // Scope the map reference so no shard lock is held while
            // effects run below.
            let reactive = registry().get(&sub_id).and_then(|weak| weak.upgrade());

            if let Some(reactive) = reactive {
                reactive.mark_maybe_dirty();
                if reactive.is_eager() {
                    effects_to_run.push(reactive);
                }
            }
        }

        for effect in effects_to_run {
            effect.run();
        }
    }
}
