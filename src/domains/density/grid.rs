use crate::domains::display::geometry::{angle_from_origin_deg, distance_from_origin};
use serde::{Deserialize, Serialize};

/// Below this many wedges the grid has no angular partition at all.
pub const MIN_WEDGE_COUNT: usize = 2;

/// Angle at which wedge 0 starts; wedges proceed clockwise from here.
pub const WEDGE_ORIGIN_DEG: f64 = 90.0;

/// Radial extent of one band: `(min, max]`, plus the origin for the innermost band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandRange {
    pub min: f64,
    pub max: f64,
    pub includes_min: bool,
}

impl BandRange {
    pub fn contains(&self, distance: f64) -> bool {
        let above_min = distance > self.min || (self.includes_min && distance >= self.min);
        above_min && distance <= self.max
    }
}

/// Angular extent of one wedge: `[end, start)` in normalized degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WedgeRange {
    pub start: f64,
    pub end: f64,
}

impl WedgeRange {
    pub fn contains(&self, angle_deg: f64) -> bool {
        angle_deg < self.start && angle_deg >= self.end
    }
}

/// Fold an `atan2` angle into `[-270, 90)` so wedges can be walked clockwise
/// from 90° without wrapping.
pub fn normalize_angle(angle_deg: f64) -> f64 {
    if angle_deg >= WEDGE_ORIGIN_DEG {
        angle_deg - 360.0
    } else {
        angle_deg
    }
}

/// Polar partition of the zone: `band_count` equal rings over the zoomed
/// radius, indexed from the outside in, and `wedge_count` equal slices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarGrid {
    pub radius_m: f64,
    pub band_count: usize,
    pub wedge_count: usize,
    pub zoom_ratio: f64,
}

impl PolarGrid {
    pub fn new(radius_m: f64, band_count: usize, wedge_count: usize) -> Self {
        Self {
            radius_m,
            band_count,
            wedge_count,
            zoom_ratio: 1.0,
        }
    }

    pub fn with_zoom_ratio(mut self, zoom_ratio: f64) -> Self {
        self.zoom_ratio = zoom_ratio;
        self
    }

    pub fn has_wedges(&self) -> bool {
        self.wedge_count >= MIN_WEDGE_COUNT
    }

    pub fn band_width(&self) -> f64 {
        self.radius_m / self.band_count as f64
    }

    /// Band 0 is the outer ring, band `band_count - 1` touches the origin.
    pub fn band_range(&self, band: usize) -> BandRange {
        let width = self.band_width();
        let outer_steps = (self.band_count - band) as f64;
        BandRange {
            min: width * (outer_steps - 1.0) * self.zoom_ratio,
            max: width * outer_steps * self.zoom_ratio,
            includes_min: band + 1 == self.band_count,
        }
    }

    pub fn band_ranges(&self) -> Vec<BandRange> {
        (0..self.band_count).map(|band| self.band_range(band)).collect()
    }

    pub fn wedge_size_deg(&self) -> f64 {
        360.0 / self.wedge_count as f64
    }

    pub fn wedge_range(&self, wedge: usize) -> WedgeRange {
        let size = self.wedge_size_deg();
        let start = WEDGE_ORIGIN_DEG - wedge as f64 * size;
        WedgeRange {
            start,
            end: start - size,
        }
    }

    /// Cell holding the point, if it lies inside the zoomed zone.
    pub fn locate(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !self.has_wedges() {
            return None;
        }
        let distance = distance_from_origin(x, y);
        let angle = normalize_angle(angle_from_origin_deg(x, y));
        let band = (0..self.band_count).find(|&b| self.band_range(b).contains(distance))?;
        let wedge = (0..self.wedge_count).find(|&w| self.wedge_range(w).contains(angle))?;
        Some((band, wedge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_tile_the_radius() {
        let grid = PolarGrid::new(10_000.0, 7, 12);
        let ranges = grid.band_ranges();
        assert!((ranges[0].max - 10_000.0).abs() < 1e-9);
        assert_eq!(ranges[6].min, 0.0);
        for pair in ranges.windows(2) {
            assert!((pair[0].min - pair[1].max).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zoom_scales_band_bounds() {
        let grid = PolarGrid::new(7_000.0, 7, 12).with_zoom_ratio(0.5);
        assert_eq!(grid.band_range(0).max, 3_500.0);
        assert_eq!(grid.band_range(6).max, 500.0);
    }

    #[test]
    fn test_wedges_walk_clockwise_from_ninety_degrees() {
        let grid = PolarGrid::new(1.0, 1, 4);
        assert_eq!(grid.wedge_range(0), WedgeRange { start: 90.0, end: 0.0 });
        assert_eq!(grid.wedge_range(3), WedgeRange { start: -180.0, end: -270.0 });
    }

    #[test]
    fn test_boundary_angles_and_origin_are_located() {
        let grid = PolarGrid::new(100.0, 2, 4);
        // due north normalizes to -270 and lands in the last wedge
        assert_eq!(grid.locate(0.0, 10.0), Some((1, 3)));
        assert_eq!(grid.locate(0.0, 0.0), Some((1, 0)));
        assert_eq!(grid.locate(-60.0, 0.0), Some((0, 2)));
        assert_eq!(grid.locate(200.0, 0.0), None);
    }
}
