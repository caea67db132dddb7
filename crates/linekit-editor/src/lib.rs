//! # LineKit Editor
//!
//! Undoable editing of measurement documents on top of the history engine,
//! plus a keyed store for saved measurements.
//!
//! ```rust,ignore
//! let editor = MeasurementEditor::new(Measurement::new("plan.png", None))?;
//! let wall = editor.create_group("Walls", None).await?;
//! let line = editor.add_line(segment, Some(wall)).await?;
//! editor.undo();
//! ```

pub mod editor;
pub mod error;
pub mod store;

pub use editor::MeasurementEditor;
pub use error::{EditorError, EditorResult, StoreError, StoreResult};
pub use store::{InMemoryStore, MeasurementRecord, MeasurementStore, RecordId};
