//! Measurement aggregate.
//!
//! The record threaded through the history engine: reference image, display
//! settings, view transform, the owned line list and the group hierarchy.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{MeasurementError, Result};
use crate::geometry::{LineSegment, Vector2};
use crate::tree::{self, MeasurementTree, NodeId};

/// Identifier of a measurement line, unique within one measurement.
pub type LineId = u32;

pub const DEFAULT_NAME: &str = "unnamed";
pub const DEFAULT_LINE_COLOR: &str = "#ff0000";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_GRID_COLOR: &str = "#cccccc";

/// A line segment owned by a measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementLine {
    pub id: LineId,
    pub start: Vector2,
    pub end: Vector2,
    pub name: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_locked: bool,
}

impl MeasurementLine {
    pub fn new(id: LineId, segment: LineSegment, name: impl Into<String>) -> Self {
        Self {
            id,
            start: segment.start,
            end: segment.end,
            name: name.into(),
            is_hidden: false,
            is_locked: false,
        }
    }

    pub fn segment(&self) -> LineSegment {
        LineSegment::new(self.start, self.end)
    }

    pub fn set_segment(&mut self, segment: LineSegment) {
        self.start = segment.start;
        self.end = segment.end;
    }

    pub fn length(&self) -> f64 {
        self.segment().length()
    }
}

/// The full editable document.
///
/// Missing fields in a decoded document are filled from [`Measurement::default`],
/// so documents written before a field existed still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Measurement {
    pub name: String,
    pub image: String,
    pub line_color: String,
    pub text_color: String,
    pub grid_color: String,
    pub grid_size: f64,
    pub grid_offset_x: f64,
    pub grid_offset_y: f64,
    pub show_grid: bool,
    pub show_text: bool,
    pub show_real: bool,
    pub select_mode: bool,
    pub auto_lock: bool,
    pub pixel_perfect: bool,
    /// Real-world units per image pixel.
    pub ratio: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    pub lines: Vec<MeasurementLine>,
    pub hierarchy: Vec<MeasurementTree>,
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            image: String::new(),
            line_color: DEFAULT_LINE_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            grid_color: DEFAULT_GRID_COLOR.to_string(),
            grid_size: 1.0,
            grid_offset_x: 0.0,
            grid_offset_y: 0.0,
            show_grid: false,
            show_text: true,
            show_real: true,
            select_mode: true,
            auto_lock: false,
            pixel_perfect: true,
            ratio: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            lines: Vec::new(),
            hierarchy: Vec::new(),
        }
    }
}

impl Measurement {
    /// Creates an empty measurement over `image`, named `"unnamed"` unless a
    /// name is given.
    pub fn new(image: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or(DEFAULT_NAME).to_string(),
            image: image.into(),
            ..Self::default()
        }
    }

    /// Decodes a measurement document, defaulting any missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn line(&self, id: LineId) -> Option<&MeasurementLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut MeasurementLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    pub fn max_line_id(&self) -> LineId {
        self.lines.iter().map(|line| line.id).max().unwrap_or(0)
    }

    /// Next free line id, or `None` once `LineId::MAX` is in use.
    ///
    /// Also skips every id already used in the hierarchy, so the leaf created
    /// for the new line can never collide with an existing group.
    pub fn next_line_id(&self) -> Option<LineId> {
        self.max_line_id()
            .max(tree::max_id(&self.hierarchy))
            .checked_add(1)
    }

    /// Lines whose leaves are no longer reachable from the hierarchy.
    pub fn orphaned_lines(&self) -> Vec<LineId> {
        let reachable: HashSet<NodeId> = tree::leaf_ids(&self.hierarchy).into_iter().collect();
        self.lines
            .iter()
            .filter(|line| !reachable.contains(&line.id))
            .map(|line| line.id)
            .collect()
    }

    /// Drops lines that no leaf references. Returns how many were removed.
    pub fn prune_orphaned_lines(&mut self) -> usize {
        let reachable: HashSet<NodeId> = tree::leaf_ids(&self.hierarchy).into_iter().collect();
        let before = self.lines.len();
        self.lines.retain(|line| reachable.contains(&line.id));
        before - self.lines.len()
    }

    /// Checks the structural invariants the tree algorithms rely on callers
    /// to uphold: unique line ids, unique node ids, and leaves that reference
    /// existing lines.
    pub fn validate(&self) -> std::result::Result<(), MeasurementError> {
        let mut line_ids = HashSet::new();
        for line in &self.lines {
            if !line_ids.insert(line.id) {
                return Err(MeasurementError::DuplicateLineId { id: line.id });
            }
        }

        let mut node_ids = HashSet::new();
        for id in tree::node_ids(&self.hierarchy) {
            if !node_ids.insert(id) {
                return Err(MeasurementError::DuplicateNodeId { id });
            }
        }

        for id in tree::leaf_ids(&self.hierarchy) {
            if !line_ids.contains(&id) {
                return Err(MeasurementError::DanglingLeaf { id });
            }
        }

        let leaves: HashSet<NodeId> = tree::leaf_ids(&self.hierarchy).into_iter().collect();
        for id in node_ids.difference(&leaves) {
            if line_ids.contains(id) {
                return Err(MeasurementError::GroupLineCollision { id: *id });
            }
        }

        Ok(())
    }

    /// Rejects NaN and infinities in every numeric field.
    ///
    /// NaN never compares equal to itself, so a document holding one would
    /// defeat duplicate detection in the history.
    pub fn check_finite(&self) -> std::result::Result<(), MeasurementError> {
        let settings = [
            ("gridSize", self.grid_size),
            ("gridOffsetX", self.grid_offset_x),
            ("gridOffsetY", self.grid_offset_y),
            ("ratio", self.ratio),
            ("offsetX", self.offset_x),
            ("offsetY", self.offset_y),
            ("scale", self.scale),
        ];
        if let Some((field, _)) = settings.iter().find(|(_, value)| !value.is_finite()) {
            return Err(MeasurementError::NonFinite {
                field: field.to_string(),
            });
        }

        for line in &self.lines {
            let coords = [
                ("start.x", line.start.x),
                ("start.y", line.start.y),
                ("end.x", line.end.x),
                ("end.y", line.end.y),
            ];
            if let Some((field, _)) = coords.iter().find(|(_, value)| !value.is_finite()) {
                return Err(MeasurementError::NonFinite {
                    field: format!("lines[{}].{}", line.id, field),
                });
            }
        }

        Ok(())
    }
}
