//! # LineKit
//!
//! Editing core for an interactive line-measurement tool: users draw line
//! segments over an image, organise them into nested groups, and step back
//! and forth through their edits.
//!
//! ## Architecture
//!
//! LineKit is organized as a workspace with multiple crates:
//!
//! 1. **linekit-core** - Geometry kernel, measurement tree, measurement document
//! 2. **linekit-history** - Generic linear undo/redo over immutable snapshots
//! 3. **linekit-settings** - Configuration files and defaults
//! 4. **linekit-editor** - Undoable measurement editing and record storage
//! 5. **linekit** - Headless binary that inspects measurement files

pub mod report;

pub use linekit_core::{
    align_snapped, closest_line, displayed_lines, radian_to_degree, snapped_angle, ClosestLine,
    DisplayPrecision, DisplayedLine, EndpointKind, Error, LineId, LineSegment, Measurement,
    MeasurementError, MeasurementLine, MeasurementTree, NodeId, Result, TreeGroup, TreeLeaf,
    Vector2,
};
pub use linekit_editor::{
    EditorError, EditorResult, InMemoryStore, MeasurementEditor, MeasurementRecord,
    MeasurementStore,
};
pub use linekit_history::{CommitHandle, CommitOutcome, HistoryEngine, HistorySnapshot, Snapshot};
pub use linekit_settings::{Config, EditorSettings, LoggingSettings, MeasurementDefaults};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("LINEKIT_BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, falling back to `info`
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with("info")
}

/// Initialize logging, using `default_directive` when `RUST_LOG` is unset.
pub fn init_logging_with(default_directive: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
