//! Snapshot values stored by the history engine.

/// A value that can be stored as an immutable history entry.
///
/// `Clone` is the structural copy used on the way in and out of the stack,
/// `PartialEq` is the structural equality used to drop redundant commits.
/// Implemented for every type that satisfies the bounds.
///
/// `PartialEq` must be reflexive for duplicate detection to work: a value
/// holding a float NaN never equals itself and is committed every time.
/// Reject non-finite values before committing them.
pub trait Snapshot: Clone + PartialEq + Send + Sync + 'static {}

impl<T> Snapshot for T where T: Clone + PartialEq + Send + Sync + 'static {}

/// The current value together with its position in the history.
///
/// Published to observers on every depth change.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot<T> {
    /// Copy of the entry at `depth`.
    pub value: T,
    /// Index of the current entry.
    pub depth: usize,
    /// Number of entries in the stack, including the initial one.
    pub len: usize,
}

impl<T> HistorySnapshot<T> {
    pub fn can_undo(&self) -> bool {
        self.depth > 0
    }

    pub fn can_redo(&self) -> bool {
        self.depth + 1 < self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_flags() {
        let first = HistorySnapshot {
            value: 0,
            depth: 0,
            len: 1,
        };
        assert!(!first.can_undo());
        assert!(!first.can_redo());

        let middle = HistorySnapshot {
            value: 1,
            depth: 1,
            len: 3,
        };
        assert!(middle.can_undo());
        assert!(middle.can_redo());
    }
}
