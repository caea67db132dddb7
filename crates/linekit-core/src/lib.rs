//! # LineKit Core
//!
//! Core types and algorithms for LineKit.
//! Provides the geometry kernel, the measurement tree, the measurement
//! aggregate and the derived values (hit tests, formatted labels) that the
//! editing layer builds on.

pub mod display;
pub mod error;
pub mod geometry;
pub mod measurement;
pub mod tree;

pub use display::{
    closest_line, displayed_lines, ClosestLine, DisplayPrecision, DisplayedLine, EndpointKind,
};
pub use error::{Error, MeasurementError, Result};
pub use geometry::{align_snapped, radian_to_degree, snapped_angle, LineSegment, Vector2};
pub use measurement::{LineId, Measurement, MeasurementLine};
pub use tree::{
    create_group, locate_group, locate_group_mut, locate_leaf, max_id, remove_node,
    MeasurementTree, NodeId, TreeGroup, TreeLeaf,
};
