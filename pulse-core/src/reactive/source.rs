//! Unified readable cell.
//!
//! Operators accept either flavor of cell, a mutable [`Signal`] or a
//! derived [`Memo`], so both are folded into one readable [`Source`]
//! type. Cloning a `Source` clones the handle, not the cell.

use std::fmt::Debug;

use super::memo::Memo;
use super::signal::Signal;

/// Either a mutable signal or a derived memo, read uniformly.
pub enum Source<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A mutable cell.
    Signal(Signal<T>),
    /// A derived, read-only cell.
    Memo(Memo<T>),
}

impl<T> Source<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Get the current value, tracked if inside a computation.
    pub fn get(&self) -> T {
        match self {
            Source::Signal(signal) => signal.get(),
            Source::Memo(memo) => memo.get(),
        }
    }

    /// Get the current value without establishing a dependency.
    pub fn get_untracked(&self) -> T {
        match self {
            Source::Signal(signal) => signal.get_untracked(),
            Source::Memo(memo) => memo.get_untracked(),
        }
    }

    /// Whether this source accepts writes.
    pub fn is_writable(&self) -> bool {
        matches!(self, Source::Signal(_))
    }
}

impl<T> Clone for Source<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        match self {
            Source::Signal(signal) => Source::Signal(signal.clone()),
            Source::Memo(memo) => Source::Memo(memo.clone()),
        }
    }
}

impl<T> From<Signal<T>> for Source<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from(signal: Signal<T>) -> Self {
        Source::Signal(signal)
    }
}

impl<T> From<Memo<T>> for Source<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from(memo: Memo<T>) -> Self {
        Source::Memo(memo)
    }
}

impl<T> Debug for Source<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Signal(signal) => f.debug_tuple("Source::Signal").field(signal).finish(),
            Source::Memo(memo) => f.debug_tuple("Source::Memo").field(memo).finish(),
        }
    }
}
