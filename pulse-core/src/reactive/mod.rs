//! Reactive Primitives
//!
//! This module implements the cell layer the operator library is built on:
//! signals, memos, effects, and the machinery that connects them.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state. When a signal's value is
//! read within a tracking context (a memo or effect), the signal
//! automatically registers that context as a dependent. When the value
//! changes, all dependents are notified.
//!
//! ## Memos
//!
//! A Memo is a derived value that caches its result. It re-evaluates only
//! when one of its dependencies changed, and only when actually read
//! (lazy pull with push-triggered invalidation).
//!
//! ## Effects
//!
//! An Effect is a side-effecting computation that re-runs whenever its
//! dependencies change. The operator library uses effects to bridge timed
//! and multi-source events back into the synchronous graph.
//!
//! ## Scopes
//!
//! A Scope owns the effects created while it is active and disposes them
//! with it, which is how operator-internal effects are torn down.
//!
//! # Implementation Notes
//!
//! Dependency detection uses a thread-local tracking context: reading a
//! signal checks for an active context and registers the edge. This
//! "automatic dependency tracking" approach is the one used by SolidJS,
//! Vue 3, and Leptos.

mod context;
mod effect;
mod memo;
mod runtime;
mod scope;
mod signal;
mod source;
mod subscriber;

pub use context::{untracked, TrackingContext};
pub use effect::Effect;
pub use memo::{Memo, MemoState};
pub use runtime::{Reactive, ReactiveHandle, Runtime};
pub use scope::Scope;
pub use signal::Signal;
pub use source::Source;
pub use subscriber::SubscriberId;
