//! Geometry kernel.
//!
//! Pure functions over 2D points and directed line segments. Nothing in this
//! module holds state, so every function is reentrant and can be called from
//! any thread.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, PI};
use std::ops::{Add, Sub};

/// Angular step used by [`align_snapped`] (45°).
pub const SNAP_ANGLE_STEP: f64 = FRAC_PI_4;

/// A point or offset in image space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Vector2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Rounds both components to the nearest integer.
    ///
    /// Ties round half away from zero (`0.5 -> 1`, `-0.5 -> -1`), which is the
    /// behaviour of [`f64::round`].
    pub fn rounded(&self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A directed segment. Direction affects [`LineSegment::angle`] but not
/// [`LineSegment::length`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Vector2,
    pub end: Vector2,
}

impl LineSegment {
    pub fn new(start: Vector2, end: Vector2) -> Self {
        Self { start, end }
    }

    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Euclidean length; 0 for a degenerate segment.
    pub fn length(&self) -> f64 {
        let d = self.delta();
        d.x.hypot(d.y)
    }

    /// Direction in radians, in `(-π, π]`.
    pub fn angle(&self) -> f64 {
        let d = self.delta();
        d.y.atan2(d.x)
    }

    pub fn midpoint(&self) -> Vector2 {
        Vector2::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Distance from `point` to the nearest point of this segment.
    ///
    /// The projection of `point` onto the carrier line is clamped to the
    /// segment's extent. A degenerate segment behaves like a single point.
    pub fn closest_distance(&self, point: Vector2) -> f64 {
        let ab = self.delta();
        let ap = point - self.start;

        let ab_squared = ab.x * ab.x + ab.y * ab.y;
        if ab_squared == 0.0 {
            return ap.x.hypot(ap.y);
        }

        let t = ((ap.x * ab.x + ap.y * ab.y) / ab_squared).clamp(0.0, 1.0);
        let closest = Vector2::new(self.start.x + t * ab.x, self.start.y + t * ab.y);
        point.distance_to(&closest)
    }

    pub fn rounded(&self) -> Self {
        Self::new(self.start.rounded(), self.end.rounded())
    }
}

/// Converts an angle from [`LineSegment::angle`] (`(-π, π]`) to degrees in
/// `[0, 360)`.
pub fn radian_to_degree(radian: f64) -> f64 {
    (radian.to_degrees() + 360.0) % 360.0
}

/// Snaps the drag from `from` to `to` onto the nearest 45° direction.
///
/// Horizontal and vertical results use `max(|dx|, |dy|)` as length so that
/// axis-aligned drags stay pixel consistent; diagonal results keep the true
/// Euclidean length. The snap index is `round(angle / 45°)` with ties away
/// from zero.
pub fn align_snapped(from: Vector2, to: Vector2) -> Vector2 {
    let d = to - from;
    let angle = d.y.atan2(d.x);
    let step = (angle / SNAP_ANGLE_STEP).round() as i64;

    let direction = if step % 2 == 0 {
        // exact unit vectors; cos(π/2) is not 0 in floating point
        match step.rem_euclid(8) {
            0 => Vector2::new(1.0, 0.0),
            2 => Vector2::new(0.0, 1.0),
            4 => Vector2::new(-1.0, 0.0),
            _ => Vector2::new(0.0, -1.0),
        }
    } else {
        let snapped = step as f64 * SNAP_ANGLE_STEP;
        Vector2::new(snapped.cos(), snapped.sin())
    };

    let length = if step % 2 == 0 {
        d.x.abs().max(d.y.abs())
    } else {
        d.x.hypot(d.y)
    };

    Vector2::new(from.x + direction.x * length, from.y + direction.y * length)
}

/// Snapped angle in radians that [`align_snapped`] would use for this drag.
pub fn snapped_angle(from: Vector2, to: Vector2) -> f64 {
    let d = to - from;
    let angle = d.y.atan2(d.x);
    let snapped = (angle / SNAP_ANGLE_STEP).round() * SNAP_ANGLE_STEP;
    if snapped <= -PI {
        snapped + 2.0 * PI
    } else {
        snapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment {
        LineSegment::new(Vector2::new(x1, y1), Vector2::new(x2, y2))
    }

    #[test]
    fn test_length() {
        assert_eq!(seg(0.0, 0.0, 3.0, 4.0).length(), 5.0);
        assert_eq!(seg(2.0, 2.0, 2.0, 2.0).length(), 0.0);
    }

    #[test]
    fn test_angle() {
        assert_eq!(seg(0.0, 0.0, 1.0, 0.0).angle(), 0.0);
        assert!((seg(0.0, 0.0, 0.0, 1.0).angle() - PI / 2.0).abs() < EPS);
        assert!((seg(0.0, 0.0, -1.0, 0.0).angle() - PI).abs() < EPS);
    }

    #[test]
    fn test_radian_to_degree_normalizes() {
        assert!((radian_to_degree(0.0)).abs() < EPS);
        assert!((radian_to_degree(-PI / 2.0) - 270.0).abs() < EPS);
        assert!((radian_to_degree(PI) - 180.0).abs() < EPS);
    }

    #[test]
    fn test_midpoint_is_unrounded() {
        assert_eq!(seg(0.0, 0.0, 1.0, 3.0).midpoint(), Vector2::new(0.5, 1.5));
    }

    #[test]
    fn test_rounding_ties_away_from_zero() {
        assert_eq!(Vector2::new(0.5, -0.5).rounded(), Vector2::new(1.0, -1.0));
        assert_eq!(Vector2::new(1.4, -1.6).rounded(), Vector2::new(1.0, -2.0));
    }

    #[test]
    fn test_closest_distance() {
        let line = seg(0.0, 0.0, 10.0, 0.0);
        assert_eq!(line.closest_distance(Vector2::new(0.0, 5.0)), 5.0);
        assert_eq!(line.closest_distance(Vector2::new(-5.0, 0.0)), 5.0);
        assert_eq!(line.closest_distance(Vector2::new(13.0, 4.0)), 5.0);
        assert_eq!(line.closest_distance(Vector2::new(4.0, -2.0)), 2.0);
    }

    #[test]
    fn test_closest_distance_degenerate() {
        let point = seg(1.0, 1.0, 1.0, 1.0);
        assert_eq!(point.closest_distance(Vector2::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn test_align_axis_uses_max_component() {
        let snapped = align_snapped(Vector2::ZERO, Vector2::new(10.0, 1.0));
        assert_eq!(snapped, Vector2::new(10.0, 0.0));

        let snapped = align_snapped(Vector2::new(5.0, 5.0), Vector2::new(4.0, -7.0));
        assert_eq!(snapped, Vector2::new(5.0, -7.0));
    }

    #[test]
    fn test_align_diagonal_uses_euclidean_length() {
        let snapped = align_snapped(Vector2::ZERO, Vector2::new(10.0, 10.0));
        assert!((snapped.x - 10.0).abs() < EPS);
        assert!((snapped.y - 10.0).abs() < EPS);
        assert!((snapped.distance_to(&Vector2::ZERO) - 200f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_align_negative_x_axis() {
        let snapped = align_snapped(Vector2::ZERO, Vector2::new(-8.0, 0.5));
        assert_eq!(snapped, Vector2::new(-8.0, 0.0));
        let snapped = align_snapped(Vector2::ZERO, Vector2::new(-8.0, -0.5));
        assert_eq!(snapped, Vector2::new(-8.0, 0.0));
    }

    #[test]
    fn test_snapped_angle() {
        assert_eq!(snapped_angle(Vector2::ZERO, Vector2::new(10.0, 1.0)), 0.0);
        assert!((snapped_angle(Vector2::ZERO, Vector2::new(3.0, 2.8)) - FRAC_PI_4).abs() < EPS);
        assert!((snapped_angle(Vector2::ZERO, Vector2::new(-8.0, -0.5)) - PI).abs() < EPS);
    }
}
