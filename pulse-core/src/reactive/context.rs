//! Tracking Context
//!
//! The tracking context records which computation is currently running so
//! that reading a signal can register the computation as a dependent.
//!
//! # Implementation
//!
//! A thread-local stack holds one frame per in-flight computation. Entering
//! a context (running a memo or an effect) pushes a frame; the frame is
//! popped by a guard when the computation finishes, so the stack stays
//! consistent even if the computation panics.
//!
//! Nested contexts work naturally: a memo that reads another memo pushes a
//! second frame, and reads inside the inner computation land on the inner
//! frame only.
//!
//! # Untracked reads
//!
//! [`untracked`] pushes a frame with tracking suspended. Reads performed
//! while that frame is on top register nothing, and tracking resumes when
//! the scope exits on any path.

use std::cell::RefCell;

use smallvec::SmallVec;

use super::SubscriberId;

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<ContextFrame>> = RefCell::new(Vec::new());
}

/// One frame of the tracking stack.
struct ContextFrame {
    /// The subscriber this frame collects dependencies for. `None` for an
    /// untracked scope.
    subscriber_id: Option<SubscriberId>,
    /// Signal ids read while this frame was on top.
    dependencies: SmallVec<[u64; 8]>,
}

/// Guard that pops its frame when dropped.
pub struct TrackingContext {
    subscriber_id: Option<SubscriberId>,
}

impl TrackingContext {
    /// Enter a tracking context for the given subscriber.
    ///
    /// While this frame is on top of the stack, every tracked signal read
    /// is recorded as a dependency of `subscriber_id`.
    pub fn enter(subscriber_id: SubscriberId) -> Self {
        CONTEXT_STACK.with(|stack| {
            stack.borrow_mut().push(ContextFrame {
                subscriber_id: Some(subscriber_id),
                dependencies: SmallVec::new(),
            });
        });

        Self {
            subscriber_id: Some(subscriber_id),
        }
    }

    /// Enter a scope in which reads register no dependencies.
    fn enter_untracked() -> Self {
        CONTEXT_STACK.with(|stack| {
            stack.borrow_mut().push(ContextFrame {
                subscriber_id: None,
                dependencies: SmallVec::new(),
            });
        });

        Self { subscriber_id: None }
    }

    /// Whether reads should currently be tracked.
    pub fn is_tracking() -> bool {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .map(|frame| frame.subscriber_id.is_some())
                .unwrap_or(false)
        })
    }

    /// The subscriber collecting dependencies, if tracking is active.
    pub fn current_subscriber() -> Option<SubscriberId> {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .and_then(|frame| frame.subscriber_id)
        })
    }

    /// Record a read of the given signal in the current frame.
    ///
    /// Called by signals when they are read. No-op in an untracked scope
    /// or outside any context.
    pub fn track_dependency(signal_id: u64) {
        CONTEXT_STACK.with(|stack| {
            if let Some(frame) = stack.borrow_mut().last_mut() {
                if frame.subscriber_id.is_some() && !frame.dependencies.contains(&signal_id) {
                    frame.dependencies.push(signal_id);
                }
            }
        });
    }

    /// The dependencies collected by the current frame so far.
    pub fn collected_dependencies() -> Vec<u64> {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .map(|frame| frame.dependencies.to_vec())
                .unwrap_or_default()
        })
    }
}

impl Drop for TrackingContext {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();

            // Catch mismatched enter/exit pairs early.
            if let Some(frame) = popped {
                debug_assert_eq!(
                    frame.subscriber_id, self.subscriber_id,
                    "TrackingContext mismatch: expected {:?}, got {:?}",
                    self.subscriber_id, frame.subscriber_id
                );
            }
        });
    }
}

/// Run `f` with dependency tracking suspended.
///
/// Any cell read inside `f` is a "peek": it returns the current value
/// without registering an edge in the dependency graph. Tracking resumes
/// when `f` returns or panics.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let _guard = TrackingContext::enter_untracked();
    f()
}
