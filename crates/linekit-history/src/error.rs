//! Error types for the history crate.

use thiserror::Error;

/// Errors that can occur while driving a [`crate::HistoryEngine`].
///
/// Normal edit sequences never fail: undo below the first entry and redo past
/// the last one are clamped. These errors only describe a missing or stopped
/// commit worker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The engine was created outside a Tokio runtime.
    #[error("History engine requires a running Tokio runtime")]
    NoRuntime,

    /// The commit worker stopped before acknowledging the commit.
    #[error("History commit worker stopped before acknowledging the commit")]
    WorkerStopped,
}

/// Result type alias for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_error_display() {
        assert_eq!(
            HistoryError::NoRuntime.to_string(),
            "History engine requires a running Tokio runtime"
        );
        assert_eq!(
            HistoryError::WorkerStopped.to_string(),
            "History commit worker stopped before acknowledging the commit"
        );
    }
}
