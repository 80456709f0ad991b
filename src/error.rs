//! Error taxonomy and logging helpers.
//!
//! The core itself has no fatal states: every in-dispatch anomaly degrades
//! to "no expansion this invocation". Typed errors exist only at the
//! persistence boundary, where snapshot I/O and parsing can fail.

use thiserror::Error;
use tracing::{error, warn};

/// Errors raised at the persistence boundary.
#[derive(Error, Debug)]
pub enum SnipkitError {
    #[error("Failed to parse trigger snapshot: {0}")]
    SnapshotParse(#[from] serde_json::Error),

    #[error("Snapshot I/O failed for '{path}': {source}")]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot watch error: {0}")]
    Watch(String),
}

pub type Result<T> = std::result::Result<T, SnipkitError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use on the fire-and-forget paths where a failure means the current
/// invocation simply performs no expansion.
pub trait ResultExt<T> {
    /// Log the error with caller location and return `None`. Use for
    /// recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as a warning with caller location and return `None`. Use for
    /// expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
