//! Subscriber identity for the reactive system.
//!
//! A subscriber is any computation that depends on reactive cells: a memo
//! or an effect. Subscribers are identified by a unique id that the runtime
//! uses to route invalidations.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a subscriber.
///
/// Each memo and effect gets one of these when created. The id is used to
/// record dependency edges and to look the subscriber up in the runtime
/// registry when one of its dependencies changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber id.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}
