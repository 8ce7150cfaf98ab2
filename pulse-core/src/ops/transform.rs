//! Pure synchronous operators.
//!
//! Each operator takes one source cell and returns a derived memo whose
//! value is a pure function of the source's current value. Nothing here
//! schedules work: recomputation happens lazily on read after the source
//! changed.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::reactive::{Memo, Source};

/// Derive a cell whose value is `transform(source.get())`.
///
/// The transform re-runs only when the source changed; failures inside it
/// propagate to the reader unmodified.
pub fn map<T, R, F>(source: impl Into<Source<T>>, transform: F) -> Memo<R>
where
    T: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    let source = source.into();
    Memo::new(move || transform(source.get()))
}

/// Derive a cell holding the last source value for which `predicate`
/// held.
///
/// Unlike a stream filter, this is stateful: rejected values leave the
/// previous passing value in place. Before any value has passed, the
/// output is `None`: an explicit absence, not a default.
pub fn filter<T, P>(source: impl Into<Source<T>>, predicate: P) -> Memo<Option<T>>
where
    T: Clone + Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    let source = source.into();
    let last_passing = Arc::new(RwLock::new(None::<T>));

    Memo::new(move || {
        let value = source.get();
        if predicate(&value) {
            *last_passing.write() = Some(value.clone());
            Some(value)
        } else {
            last_passing.read().clone()
        }
    })
}

/// Derive a cell equal to the source, suppressing updates whose value
/// compares equal to the previous one.
///
/// The first read always passes; after that, an equal value leaves the
/// previously returned value in place.
pub fn distinct_until_changed<T>(source: impl Into<Source<T>>) -> Memo<T>
where
    T: Clone + Send + Sync + PartialEq + 'static,
{
    let source = source.into();
    let previous = Arc::new(RwLock::new(None::<T>));

    Memo::new(move || {
        let current = source.get();
        let mut prev = previous.write();
        match prev.as_ref() {
            Some(p) if *p == current => p.clone(),
            _ => {
                *prev = Some(current.clone());
                current
            }
        }
    })
}

/// Derive a cell computed as `transform(source.get()).get()`.
///
/// The inner cell is re-derived fresh on every outer change (nothing is
/// cached across outer values) and the inner read is tracked, so a
/// change to a long-lived inner cell also recomputes the output.
pub fn switch_map<T, R, S, F>(source: impl Into<Source<T>>, transform: F) -> Memo<R>
where
    T: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    S: Into<Source<R>>,
    F: Fn(T) -> S + Send + Sync + 'static,
{
    let source = source.into();
    Memo::new(move || transform(source.get()).into().get())
}
