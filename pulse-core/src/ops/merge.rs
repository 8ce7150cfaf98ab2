//! Stream-style merge adapted to pull-based cells.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::OperatorError;
use crate::reactive::{Effect, Memo, Signal, Source};

/// Derive a cell holding the most recent value emitted by any source.
///
/// One bridging effect is registered per source, in argument order; when
/// several sources change within one propagation batch, the tie is broken
/// by that registration order (stable). Only the latest emission is
/// retained; the merged cell is "last write wins", not a history.
///
/// Before any source has changed, the merged value is the first source's
/// current value, read without establishing a dependency.
///
/// The bridging effects are owned by the [`Scope`](crate::reactive::Scope)
/// active at construction time; dispose that scope to tear the merge down.
/// Built outside any scope, they live until process teardown.
///
/// Errors when called with no sources.
pub fn merge<T>(sources: Vec<Source<T>>) -> Result<Memo<T>, OperatorError>
where
    T: Clone + Send + Sync + 'static,
{
    if sources.is_empty() {
        return Err(OperatorError::MergeWithoutSources);
    }

    // Private bridging cell: `None` until any source emits.
    let last_emitted: Signal<Option<T>> = Signal::new(None);

    for source in &sources {
        let source = source.clone();
        let last_emitted = last_emitted.clone();
        let establishing = AtomicBool::new(true);

        Effect::new(move || {
            let value = source.get();

            // The construction-time run only records the dependency; an
            // emission happens on actual change.
            if establishing.swap(false, Ordering::SeqCst) {
                return;
            }

            last_emitted.set(Some(value));
        });
    }

    let first = sources[0].clone();
    Ok(Memo::new(move || match last_emitted.get() {
        Some(value) => value,
        None => first.get_untracked(),
    }))
}
