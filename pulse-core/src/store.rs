//! Keyed state container.
//!
//! A thin convenience layer over the core: one mutable cell holds a whole
//! state value, and per-field derived cells are carved out of it with
//! projections. The container adds no reactivity of its own; `select` is
//! just `map` over the root cell.

use crate::pulse::Pulse;
use crate::reactive::{Memo, Signal};

/// A state container wrapping a single mutable cell.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, PartialEq)]
/// struct AppState { count: i32, name: String }
///
/// let store = Store::new(AppState { count: 0, name: "pulse".into() });
/// let count = store.select(|s| s.count);
///
/// store.update(|s| AppState { count: s.count + 1, ..s.clone() });
/// assert_eq!(count.get(), 1);
/// ```
pub struct Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: Signal<T>,
}

impl<T> Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a store from an initial state value.
    pub fn new(initial: T) -> Self {
        Self {
            state: Signal::new(initial),
        }
    }

    /// A read-only view of the whole state.
    pub fn state(&self) -> Pulse<T> {
        let state = self.state.clone();
        Pulse::from_source(Memo::new(move || state.get()))
    }

    /// Derive a cell scoped to one part of the state.
    ///
    /// The projection runs against the current state whenever it changed;
    /// it should be a cheap, pure field access.
    pub fn select<U, F>(&self, projection: F) -> Pulse<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let state = self.state.clone();
        Pulse::from_source(Memo::new(move || projection(&state.get())))
    }

    /// Replace the whole state.
    pub fn set(&self, state: T) {
        self.state.set(state);
    }

    /// Update the state from the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        self.state.update(f);
    }

    /// The current state, read without establishing a dependency.
    pub fn snapshot(&self) -> T {
        self.state.get_untracked()
    }
}
