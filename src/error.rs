//! Search-time errors and non-fatal diagnostics.

use std::fmt;

use thiserror::Error;

use crate::pattern::PatternError;

/// Errors that abort a search or suggestion request.
///
/// Malformed user patterns never show up here; they are reported as
/// [`Diagnostic`]s and the rest of the cascade still runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The caller's [`CancelToken`](crate::CancelToken) fired before the
    /// scan finished.
    #[error("search cancelled after scanning {scanned} records")]
    Cancelled {
        /// Records fully evaluated before cancellation was observed.
        scanned: usize,
    },
}

/// A non-fatal problem found while preparing a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A wildcard or regex query failed to compile. The strategy is skipped.
    InvalidPattern(PatternError),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidPattern(err) => err.fmt(f),
        }
    }
}

impl From<PatternError> for Diagnostic {
    fn from(err: PatternError) -> Self {
        Diagnostic::InvalidPattern(err)
    }
}
