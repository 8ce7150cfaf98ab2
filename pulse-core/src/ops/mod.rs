//! Signal Operators
//!
//! Free functions that take one or more cells and derive a new one,
//! without the caller wiring any subscription plumbing.
//!
//! Three families:
//!
//! - Pure synchronous: [`map`], [`filter`], [`distinct_until_changed`],
//!   [`switch_map`]: plain derived memos, no side effects.
//! - Positional combination: [`combine`], [`combine2`], [`combine3`].
//! - Impure/bridging: [`debounce`], [`sample`], [`merge`]: these allocate
//!   a private output cell and register bridging effects, so their output
//!   changes between reads as effects fire.

mod combine;
mod merge;
mod timing;
mod transform;

pub use combine::{combine, combine2, combine3};
pub use merge::merge;
pub use timing::{debounce, sample};
pub use transform::{distinct_until_changed, filter, map, switch_map};
