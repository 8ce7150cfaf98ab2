//! Operator construction errors.

use thiserror::Error;

/// Errors raised when an operator is constructed with invalid inputs.
///
/// These are the only errors the library produces itself. Failures inside
/// caller-supplied transforms and predicates propagate unmodified (as
/// panics) to whoever triggered the recomputation; the library never
/// catches, wraps, or retries them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    /// `merge` was called with an empty source list.
    #[error("merge expected at least one source, but got none")]
    MergeWithoutSources,

    /// `combine` was called with an empty source list.
    #[error("combine expected at least one source, but got none")]
    CombineWithoutSources,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_operator() {
        assert!(OperatorError::MergeWithoutSources.to_string().contains("merge"));
        assert!(OperatorError::CombineWithoutSources
            .to_string()
            .contains("combine"));
    }
}
