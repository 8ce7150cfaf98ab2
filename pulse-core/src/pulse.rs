//! Fluent wrapper over a reactive cell.
//!
//! [`Pulse`] wraps exactly one cell, mutable or derived, and exposes the
//! operator library as chainable methods. Each operator method returns a
//! new `Pulse` over a freshly derived cell; the original is untouched and
//! can be chained again.
//!
//! Wrapper identity is separate from cell identity: several wrappers may
//! hold cells derived from the same root, and a derived cell stays alive
//! as long as any holder references it.

use std::time::Duration;

use crate::error::OperatorError;
use crate::ops;
use crate::reactive::{Memo, Signal, Source};
use crate::scheduler::Scheduler;

/// Create a wrapper around a fresh mutable cell holding `initial`.
pub fn pulse<T>(initial: T) -> Pulse<T>
where
    T: Clone + Send + Sync + 'static,
{
    Pulse::new(initial)
}

/// A chainable handle over one reactive cell.
///
/// # Example
///
/// ```rust,ignore
/// let count = pulse(1);
/// let label = count.map(|n| format!("count: {n}"));
///
/// count.set(3);
/// assert_eq!(label.get(), "count: 3");
/// ```
pub struct Pulse<T>
where
    T: Clone + Send + Sync + 'static,
{
    source: Source<T>,
}

impl<T> Pulse<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Wrap a fresh mutable cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            source: Signal::new(initial).into(),
        }
    }

    /// Wrap an existing cell.
    pub fn from_source(source: impl Into<Source<T>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Combine raw cells positionally without an existing wrapper.
    ///
    /// Errors on an empty source list.
    pub fn combine(sources: Vec<Source<T>>) -> Result<Pulse<Vec<T>>, OperatorError> {
        ops::combine(sources).map(Pulse::from_source)
    }

    /// Merge raw cells ("most recent emission wins") without an existing
    /// wrapper.
    ///
    /// Errors on an empty source list.
    pub fn merge(sources: Vec<Source<T>>) -> Result<Pulse<T>, OperatorError> {
        ops::merge(sources).map(Pulse::from_source)
    }

    /// Derive a wrapper over `transform(value)`.
    pub fn map<R, F>(&self, transform: F) -> Pulse<R>
    where
        R: Clone + Send + Sync + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Pulse::from_source(ops::map(self.source.clone(), transform))
    }

    /// Derive a wrapper over the last value passing `predicate`; `None`
    /// before any value has passed.
    pub fn filter<P>(&self, predicate: P) -> Pulse<Option<T>>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Pulse::from_source(ops::filter(self.source.clone(), predicate))
    }

    /// Derive a wrapper that follows this cell once it has been stable
    /// for `delay`.
    pub fn debounce(&self, delay: Duration, scheduler: &Scheduler) -> Pulse<T> {
        Pulse::from_source(ops::debounce(self.source.clone(), delay, scheduler))
    }

    /// Derive a wrapper suppressing consecutive equal values.
    pub fn distinct_until_changed(&self) -> Pulse<T>
    where
        T: PartialEq,
    {
        Pulse::from_source(ops::distinct_until_changed(self.source.clone()))
    }

    /// Derive a wrapper that copies this cell's value on each `trigger`
    /// change.
    pub fn sample<U>(&self, trigger: impl Into<Source<U>>) -> Pulse<T>
    where
        U: Clone + Send + Sync + 'static,
    {
        Pulse::from_source(ops::sample(self.source.clone(), trigger))
    }

    /// Derive a wrapper over the inner cell produced by `transform`,
    /// re-derived on every change to this cell.
    pub fn switch_map<R, S, F>(&self, transform: F) -> Pulse<R>
    where
        R: Clone + Send + Sync + 'static,
        S: Into<Source<R>>,
        F: Fn(T) -> S + Send + Sync + 'static,
    {
        Pulse::from_source(ops::switch_map(self.source.clone(), transform))
    }

    /// Current value, tracked if read inside a computation.
    pub fn get(&self) -> T {
        self.source.get()
    }

    /// Set the wrapped cell's value.
    ///
    /// Silently ignored when the wrapped cell is derived: the fluent API
    /// stays safe to call uniformly whether or not the cell is mutable.
    pub fn set(&self, value: T) {
        if let Source::Signal(signal) = &self.source {
            signal.set(value);
        }
    }

    /// Update the wrapped cell's value from the current one.
    ///
    /// Silently ignored when the wrapped cell is derived, like [`set`].
    ///
    /// [`set`]: Pulse::set
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        if let Source::Signal(signal) = &self.source {
            signal.update(f);
        }
    }

    /// A read-only view of this cell: writes through the returned wrapper
    /// are ignored, reads follow the original.
    pub fn as_readonly(&self) -> Pulse<T> {
        match &self.source {
            Source::Signal(signal) => {
                let signal = signal.clone();
                Pulse::from_source(Memo::new(move || signal.get()))
            }
            Source::Memo(_) => self.clone(),
        }
    }

    /// The wrapped cell itself.
    pub fn source(&self) -> Source<T> {
        self.source.clone()
    }

    /// Whether the wrapped cell accepts writes.
    pub fn is_writable(&self) -> bool {
        self.source.is_writable()
    }
}

impl<T> Clone for Pulse<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<A, B> Pulse<(A, B)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    /// Combine two differently-typed cells into a tuple wrapper.
    pub fn combine2(a: impl Into<Source<A>>, b: impl Into<Source<B>>) -> Self {
        Pulse::from_source(ops::combine2(a, b))
    }
}

impl<A, B, C> Pulse<(A, B, C)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Combine three differently-typed cells into a tuple wrapper.
    pub fn combine3(
        a: impl Into<Source<A>>,
        b: impl Into<Source<B>>,
        c: impl Into<Source<C>>,
    ) -> Self {
        Pulse::from_source(ops::combine3(a, b, c))
    }
}
