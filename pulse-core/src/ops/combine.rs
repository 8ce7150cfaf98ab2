//! Multi-source positional combination.
//!
//! `combine` produces a cell holding every source's current value in
//! argument order, recomputed when any source changes. The homogeneous
//! form works over a `Vec` of sources; `combine2`/`combine3` cover the
//! common heterogeneous cases with tuples.

use crate::error::OperatorError;
use crate::reactive::{Memo, Source};

/// Derive a cell holding each source's current value, positionally.
///
/// Errors when called with no sources: an empty combination has no
/// meaningful value.
pub fn combine<T>(sources: Vec<Source<T>>) -> Result<Memo<Vec<T>>, OperatorError>
where
    T: Clone + Send + Sync + 'static,
{
    if sources.is_empty() {
        return Err(OperatorError::CombineWithoutSources);
    }

    Ok(Memo::new(move || {
        sources.iter().map(|source| source.get()).collect()
    }))
}

/// Derive a cell holding `(a.get(), b.get())`.
pub fn combine2<A, B>(a: impl Into<Source<A>>, b: impl Into<Source<B>>) -> Memo<(A, B)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    let a = a.into();
    let b = b.into();
    Memo::new(move || (a.get(), b.get()))
}

/// Derive a cell holding `(a.get(), b.get(), c.get())`.
pub fn combine3<A, B, C>(
    a: impl Into<Source<A>>,
    b: impl Into<Source<B>>,
    c: impl Into<Source<C>>,
) -> Memo<(A, B, C)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    let a = a.into();
    let b = b.into();
    let c = c.into();
    Memo::new(move || (a.get(), b.get(), c.get()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Signal;

    #[test]
    fn combine_requires_at_least_one_source() {
        let result = combine::<i32>(Vec::new());
        assert_eq!(result.unwrap_err(), OperatorError::CombineWithoutSources);
    }

    #[test]
    fn combine_preserves_argument_order() {
        let a = Signal::new(1);
        let b = Signal::new(2);
        let c = Signal::new(3);

        let combined = combine(vec![a.clone().into(), b.into(), c.into()]).unwrap();
        assert_eq!(combined.get(), vec![1, 2, 3]);

        a.set(10);
        assert_eq!(combined.get(), vec![10, 2, 3]);
    }

    #[test]
    fn combine2_mixes_types() {
        let a = Signal::new(1);
        let b = Signal::new("x");

        let combined = combine2(a.clone(), b.clone());
        assert_eq!(combined.get(), (1, "x"));

        // Changing one source updates only its slot.
        a.set(2);
        assert_eq!(combined.get(), (2, "x"));

        b.set("y");
        assert_eq!(combined.get(), (2, "y"));
    }

    #[test]
    fn combine3_tracks_all_sources() {
        let a = Signal::new(1u8);
        let b = Signal::new(true);
        let c = Signal::new("c");

        let combined = combine3(a, b.clone(), c);
        assert_eq!(combined.get(), (1, true, "c"));

        b.set(false);
        assert_eq!(combined.get(), (1, false, "c"));
    }

    #[test]
    fn combine_accepts_derived_sources() {
        let base = Signal::new(2);
        let doubled = crate::ops::map(base.clone(), |n| n * 2);

        let combined = combine(vec![base.clone().into(), doubled.into()]).unwrap();
        assert_eq!(combined.get(), vec![2, 4]);

        base.set(3);
        assert_eq!(combined.get(), vec![3, 6]);
    }
}
