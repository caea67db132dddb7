//! Error types for the editor crate.
//!
//! This module provides structured error types for measurement edits and
//! record storage.

use linekit_core::{LineId, MeasurementError, NodeId};
use linekit_history::HistoryError;
use thiserror::Error;

/// Errors that can occur during editor operations.
#[derive(Error, Debug)]
pub enum EditorError {
    /// No line with this id exists.
    #[error("Line not found: {id}")]
    LineNotFound { id: LineId },

    /// No group with this id exists in the hierarchy.
    #[error("Group not found: {id}")]
    GroupNotFound { id: NodeId },

    /// No node with this id exists in the hierarchy.
    #[error("Node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// The line is locked against geometric edits.
    #[error("Line {id} is locked")]
    LineLocked { id: LineId },

    /// Every id up to the maximum is already in use.
    #[error("No free line or group id left")]
    IdSpaceExhausted,

    /// The edit would leave the measurement in an invalid state.
    #[error("Invalid edit: {0}")]
    Invalid(#[from] MeasurementError),

    /// An undo or redo moved the history while the edit was in flight.
    #[error("History moved during the edit; it was not applied")]
    HistoryMoved,

    /// The history engine failed.
    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

/// Errors related to the measurement store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with this id exists.
    #[error("Measurement not found: {id}")]
    NotFound { id: u64 },
}

/// Result type alias for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_error_display() {
        let err = EditorError::LineLocked { id: 4 };
        assert_eq!(err.to_string(), "Line 4 is locked");

        let err = EditorError::GroupNotFound { id: 9 };
        assert_eq!(err.to_string(), "Group not found: 9");
    }

    #[test]
    fn test_measurement_error_conversion() {
        let err: EditorError = MeasurementError::NonFinite {
            field: "scale".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid edit: Field scale is not a finite number");
    }

    #[test]
    fn test_history_error_conversion() {
        let err: EditorError = HistoryError::WorkerStopped.into();
        assert!(matches!(err, EditorError::History(_)));
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound { id: 12 };
        assert_eq!(err.to_string(), "Measurement not found: 12");
    }
}
