use super::grid::PolarGrid;
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, PI};

pub const MIN_LABEL_FONT_SIZE: f64 = 7.0;
pub const MAX_LABEL_FONT_SIZE: f64 = 17.0;

/// Dashed wedge separator in chart space: from the center `(0.5, 0)` to `(x_max, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DividerLine {
    pub angle_rad: f64,
    pub x_max: f64,
    pub y_max: f64,
}

/// Outer distance of a band as printed on the axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandLabel {
    pub band: usize,
    pub distance_m: i64,
    pub font_size: f64,
}

pub fn wedge_dividers(grid: &PolarGrid) -> Vec<DividerLine> {
    if !grid.has_wedges() {
        return Vec::new();
    }
    let step = 2.0 * PI / grid.wedge_count as f64;
    (0..grid.wedge_count)
        .map(|index| {
            let angle_rad = FRAC_PI_2 + index as f64 * step;
            DividerLine {
                angle_rad,
                x_max: angle_rad.cos() * 0.5 + 0.5,
                y_max: angle_rad.sin() * grid.band_count as f64,
            }
        })
        .collect()
}

/// Labels from the innermost ring outwards.
pub fn band_labels(grid: &PolarGrid) -> Vec<BandLabel> {
    let font_size = label_font_size(grid.band_count);
    (0..grid.band_count)
        .map(|index| BandLabel {
            band: grid.band_count - index - 1,
            distance_m: (grid.band_width() * (index + 1) as f64 * grid.zoom_ratio).round() as i64,
            font_size,
        })
        .collect()
}

/// Seven bands print at 10pt; each band more or less moves half a point.
pub fn label_font_size(band_count: usize) -> f64 {
    let delta = (7.0 - band_count as f64) * 0.5;
    (10.0 + delta).clamp(MIN_LABEL_FONT_SIZE, MAX_LABEL_FONT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_dividers_below_two_wedges() {
        assert!(wedge_dividers(&PolarGrid::new(10.0, 3, 1)).is_empty());
        assert_eq!(wedge_dividers(&PolarGrid::new(10.0, 3, 12)).len(), 12);
    }

    #[test]
    fn test_labels_follow_zoom() {
        let grid = PolarGrid::new(10_000.0, 7, 12).with_zoom_ratio(0.5);
        let labels = band_labels(&grid);
        assert_eq!(labels[0].distance_m, 714);
        assert_eq!(labels[0].band, 6);
        assert_eq!(labels[6].distance_m, 5_000);
    }

    #[test]
    fn test_font_size_is_clamped() {
        assert_eq!(label_font_size(7), 10.0);
        assert_eq!(label_font_size(1), 13.0);
        assert_eq!(label_font_size(30), MIN_LABEL_FONT_SIZE);
    }
}
