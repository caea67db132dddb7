//! Error handling for LineKit core
//!
//! Tree lookups and geometry never fail; they signal absence with `Option` and
//! handle degenerate input explicitly. The errors here cover structural
//! validation of a measurement and decoding of measurement documents.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::measurement::LineId;
use crate::tree::NodeId;

/// Structural problems found by [`crate::Measurement::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeasurementError {
    /// Two tree nodes share an id
    #[error("Duplicate tree node id {id}")]
    DuplicateNodeId {
        /// The repeated node id.
        id: NodeId,
    },

    /// Two lines share an id
    #[error("Duplicate line id {id}")]
    DuplicateLineId {
        /// The repeated line id.
        id: LineId,
    },

    /// A leaf references a line that does not exist
    #[error("Tree leaf {id} references a missing line")]
    DanglingLeaf {
        /// The leaf id with no matching line.
        id: NodeId,
    },

    /// A group id collides with a line id, so a leaf for that line could
    /// never be inserted without breaking node-id uniqueness
    #[error("Group id {id} collides with a line id")]
    GroupLineCollision {
        /// The colliding id.
        id: NodeId,
    },

    /// A numeric field holds NaN or an infinity
    #[error("Field {field} is not a finite number")]
    NonFinite {
        /// Serialized name of the field, with the line id for line fields.
        field: String,
    },
}

/// Main error type for LineKit core
#[derive(Error, Debug)]
pub enum Error {
    /// Measurement validation error
    #[error(transparent)]
    Measurement(#[from] MeasurementError),

    /// Measurement document could not be decoded or encoded
    #[error("Invalid measurement document: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Measurement(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_error_display() {
        let err = MeasurementError::DuplicateNodeId { id: 4 };
        assert_eq!(err.to_string(), "Duplicate tree node id 4");

        let err = MeasurementError::DanglingLeaf { id: 12 };
        assert_eq!(err.to_string(), "Tree leaf 12 references a missing line");

        let err = MeasurementError::NonFinite {
            field: "ratio".to_string(),
        };
        assert_eq!(err.to_string(), "Field ratio is not a finite number");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = MeasurementError::DuplicateLineId { id: 2 }.into();
        assert!(err.is_validation_error());
        assert_eq!(err.to_string(), "Duplicate line id 2");

        let err: Error = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(!err.is_validation_error());
    }
}
