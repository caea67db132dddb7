//! Hit testing and derived display values for measurement lines.

use serde::{Deserialize, Serialize};

use crate::geometry::{radian_to_degree, Vector2};
use crate::measurement::{LineId, Measurement, MeasurementLine};

/// Which part of a line a pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Start,
    Line,
    End,
}

/// Result of [`closest_line`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestLine<'a> {
    pub line: &'a MeasurementLine,
    pub kind: EndpointKind,
    pub distance: f64,
}

/// Finds the visible line nearest to `point` within `tolerance`.
///
/// Endpoints win over the segment body when they are within tolerance, so a
/// drag can grab an end even where the body is marginally closer. Among
/// candidates the smallest distance wins; ties keep the earlier line.
pub fn closest_line(
    lines: &[MeasurementLine],
    point: Vector2,
    tolerance: f64,
) -> Option<ClosestLine<'_>> {
    let mut best: Option<ClosestLine<'_>> = None;

    for line in lines.iter().filter(|line| !line.is_hidden) {
        let start = line.start.distance_to(&point);
        let end = line.end.distance_to(&point);

        let candidate = if start <= tolerance && start <= end {
            Some((EndpointKind::Start, start))
        } else if end <= tolerance {
            Some((EndpointKind::End, end))
        } else {
            let body = line.segment().closest_distance(point);
            (body <= tolerance).then_some((EndpointKind::Line, body))
        };

        if let Some((kind, distance)) = candidate {
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(ClosestLine {
                    line,
                    kind,
                    distance,
                });
            }
        }
    }

    best
}

/// Decimal places used when formatting [`DisplayedLine`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPrecision {
    pub coordinates: usize,
    pub length: usize,
    pub angle: usize,
}

impl Default for DisplayPrecision {
    fn default() -> Self {
        Self {
            coordinates: 1,
            length: 2,
            angle: 1,
        }
    }
}

/// A visible line with its label values already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedLine {
    pub line: MeasurementLine,
    /// Midpoint x.
    pub x: String,
    /// Midpoint y.
    pub y: String,
    /// Direction in degrees, `[0, 360)`.
    pub angle: String,
    /// Length, scaled by the measurement ratio when `show_real` is set.
    pub length: String,
    pub is_closest: bool,
}

/// Derives label values for every visible line of `measurement`.
pub fn displayed_lines(
    measurement: &Measurement,
    closest: Option<LineId>,
    precision: DisplayPrecision,
) -> Vec<DisplayedLine> {
    let scale = if measurement.show_real {
        measurement.ratio
    } else {
        1.0
    };

    measurement
        .lines
        .iter()
        .filter(|line| !line.is_hidden)
        .map(|line| {
            let segment = line.segment();
            let mid = segment.midpoint();
            DisplayedLine {
                line: line.clone(),
                x: format!("{:.*}", precision.coordinates, mid.x),
                y: format!("{:.*}", precision.coordinates, mid.y),
                angle: format!("{:.*}", precision.angle, radian_to_degree(segment.angle())),
                length: format!("{:.*}", precision.length, segment.length() * scale),
                is_closest: closest == Some(line.id),
            }
        })
        .collect()
}
