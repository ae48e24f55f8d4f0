use super::grid::{normalize_angle, BandRange, PolarGrid};
use super::intervals::IntervalTable;
use crate::domains::display::geometry::{angle_from_origin_deg, distance_from_origin};
use crate::domains::mobile::MobileId;
use serde::Serialize;
use std::collections::HashMap;

/// A mobile reduced to what binning needs, computed once per cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinCandidate {
    pub id: MobileId,
    pub distance: f64,
    pub angle_deg: f64,
}

impl BinCandidate {
    pub fn new(id: MobileId, x_m: f64, y_m: f64) -> Self {
        Self {
            id,
            distance: distance_from_origin(x_m, y_m),
            angle_deg: normalize_angle(angle_from_origin_deg(x_m, y_m)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub band: usize,
    pub wedge: usize,
    pub count: usize,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandRow {
    pub range: BandRange,
    pub cells: Vec<Cell>,
}

/// Output of one binning cycle. Replaced wholesale on every recompute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DensityFrame {
    pub bands: Vec<BandRow>,
    pub highlighted_cell: Option<(usize, usize)>,
    /// Cell of every assigned mobile.
    pub assignments: HashMap<MobileId, (usize, usize)>,
    /// Candidates that fell outside every cell.
    pub unassigned: Vec<MobileId>,
}

impl DensityFrame {
    /// Every cell at zero occupancy, as shown before the first cycle.
    pub fn empty(grid: &PolarGrid, table: &IntervalTable) -> Self {
        bin(grid, table, Vec::new(), None)
    }

    pub fn cell(&self, band: usize, wedge: usize) -> Option<&Cell> {
        self.bands.get(band).and_then(|row| row.cells.get(wedge))
    }

    pub fn total_count(&self) -> usize {
        self.bands
            .iter()
            .flat_map(|row| row.cells.iter())
            .map(|cell| cell.count)
            .sum()
    }

    /// Cell colors per band, aligned with the renderer's band order.
    pub fn colors(&self) -> Vec<Vec<String>> {
        self.bands
            .iter()
            .map(|row| row.cells.iter().map(|cell| cell.color.clone()).collect())
            .collect()
    }

    /// Point the highlight at the cell holding `id`, if it was assigned.
    pub fn highlight(&mut self, id: Option<MobileId>) {
        self.highlighted_cell = id.and_then(|id| self.assignments.get(&id).copied());
    }
}

/// Classify candidates into polar cells.
///
/// Bands are visited outer to inner and wedges in order inside each band. Each
/// pass splits the remaining candidates into the ones that match and the rest,
/// and only the rest moves on, so every candidate lands in at most one cell.
pub fn bin(
    grid: &PolarGrid,
    table: &IntervalTable,
    candidates: Vec<BinCandidate>,
    highlighted: Option<MobileId>,
) -> DensityFrame {
    let mut frame = DensityFrame::default();
    let mut working = candidates;

    for band in 0..grid.band_count {
        let range = grid.band_range(band);
        let mut row = BandRow {
            range,
            cells: Vec::new(),
        };
        if !grid.has_wedges() {
            frame.bands.push(row);
            continue;
        }

        let (mut in_band, rest): (Vec<_>, Vec<_>) = working
            .into_iter()
            .partition(|candidate| range.contains(candidate.distance));
        working = rest;

        row.cells.reserve(grid.wedge_count);
        for wedge in 0..grid.wedge_count {
            let wedge_range = grid.wedge_range(wedge);
            let (matched, remaining): (Vec<_>, Vec<_>) = in_band
                .into_iter()
                .partition(|candidate| wedge_range.contains(candidate.angle_deg));
            in_band = remaining;

            for candidate in &matched {
                frame.assignments.insert(candidate.id, (band, wedge));
                if Some(candidate.id) == highlighted {
                    frame.highlighted_cell = Some((band, wedge));
                }
            }
            row.cells.push(Cell {
                band,
                wedge,
                count: matched.len(),
                color: table.color_for(matched.len()).to_string(),
            });
        }
        working.extend(in_band);
        frame.bands.push(row);
    }

    frame.unassigned = working.into_iter().map(|candidate| candidate.id).collect();
    frame
}
