//! Plane geometry shared by the plan display and the density grid.
//!
//! Indicator endpoints are computed as `x + len * cos(a)` and `y - len * sin(a)`
//! to match the renderer's plane orientation.

use serde::Serialize;
use std::f64::consts::FRAC_PI_2;

pub const DEGREES_IN_RADIAN: f64 = 180.0 / std::f64::consts::PI;

/// Zoom percentage (100 = no zoom) to the ratio applied to distances.
pub fn zoom_ratio(zoom_percent: f64) -> f64 {
    1.0 / (zoom_percent / 100.0)
}

pub fn distance_from_origin(x: f64, y: f64) -> f64 {
    x.hypot(y)
}

/// Angle of `(x, y)` seen from the origin, in degrees within `(-180, 180]`.
pub fn angle_from_origin_deg(x: f64, y: f64) -> f64 {
    y.atan2(x) * DEGREES_IN_RADIAN
}

/// Missing angles read as zero.
pub fn radians_to_degrees(radians: Option<f64>) -> f64 {
    radians.map_or(0.0, |r| r * DEGREES_IN_RADIAN)
}

/// Round to two decimals; missing values read as zero.
pub fn round_two(value: Option<f64>) -> f64 {
    value.map_or(0.0, |v| (v * 100.0).round() / 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// End of a fixed-length segment drawn from `origin` along a bearing. The
/// bearing is measured from display north, hence the quarter-turn offset.
/// Without a bearing the segment collapses onto its origin.
pub fn segment_end(origin: Point, length: f64, bearing_rad: Option<f64>) -> Point {
    match bearing_rad {
        Some(bearing) => {
            let angle = bearing - FRAC_PI_2;
            Point::new(origin.x + length * angle.cos(), origin.y - length * angle.sin())
        }
        None => origin,
    }
}

/// Equilateral triangle centred on `center`, apex up: top, bottom-left, bottom-right.
pub fn triangle_points(center: Point, side: f64) -> [Point; 3] {
    let sqrt3 = 3f64.sqrt();
    let base_y = center.y + side / (2.0 * sqrt3);
    [
        Point::new(center.x, center.y - side / sqrt3),
        Point::new(center.x - side / 2.0, base_y),
        Point::new(center.x + side / 2.0, base_y),
    ]
}

/// Diamond centred on `center`: top, right, bottom, left.
pub fn diamond_points(center: Point, side: f64) -> [Point; 4] {
    let half = side / 2.0;
    [
        Point::new(center.x, center.y - half),
        Point::new(center.x + half, center.y),
        Point::new(center.x, center.y + half),
        Point::new(center.x - half, center.y),
    ]
}

pub fn square_top_left(center: Point, side: f64) -> Point {
    Point::new(center.x - side / 2.0, center.y - side / 2.0)
}
