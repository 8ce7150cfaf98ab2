//! Pulse Core
//!
//! A small signal operator library on top of a fine-grained reactive
//! primitive. It implements:
//!
//! - Reactive primitives (signals, memos, effects, scopes)
//! - Operators that derive, combine, and time-shift cells without manual
//!   subscription plumbing: `map`, `filter`, `debounce`,
//!   `distinct_until_changed`, `combine`, `merge`, `sample`, `switch_map`
//! - A fluent, chainable wrapper type ([`Pulse`])
//! - A keyed state container ([`Store`])
//!
//! # Architecture
//!
//! - `reactive`: cells and dependency tracking, lazy pull evaluation with
//!   push-triggered invalidation
//! - `ops`: the operator library
//! - `scheduler`: virtual-time timers and the microtask queue the timing
//!   operators bridge through
//! - `pulse` / `store`: the fluent wrapper and the state container
//!
//! # Example
//!
//! ```rust,ignore
//! use pulse_core::pulse;
//!
//! let count = pulse(1);
//! let label = count.map(|n| format!("count: {n}"));
//!
//! assert_eq!(label.get(), "count: 1");
//!
//! count.set(3);
//! assert_eq!(label.get(), "count: 3");
//! ```

pub mod error;
pub mod ops;
pub mod pulse;
pub mod reactive;
pub mod scheduler;
pub mod store;

pub use error::OperatorError;
pub use pulse::{pulse, Pulse};
pub use reactive::{untracked, Effect, Memo, Scope, Signal, Source};
pub use scheduler::{Scheduler, TimerHandle};
pub use store::Store;
