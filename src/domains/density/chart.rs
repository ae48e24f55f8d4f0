use super::binner::{bin, BinCandidate, DensityFrame};
use super::grid::PolarGrid;
use super::intervals::IntervalTable;
use crate::common::DomainResult;
use crate::domains::mobile::MobileId;
use serde::Serialize;

pub const DEFAULT_BORDER_COLOR: &str = "rgb(211, 211, 211)";
pub const SELECTED_BORDER_COLOR: &str = "rgb(255, 0, 0)";
pub const DEFAULT_BORDER_WIDTH: u32 = 1;
pub const SELECTED_BORDER_WIDTH: u32 = 4;
pub const DEFAULT_BORDER_DASH: [u32; 2] = [0, 0];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorderStyle {
    pub color: String,
    pub width: u32,
    pub dash: [u32; 2],
}

impl BorderStyle {
    pub fn plain() -> Self {
        Self {
            color: DEFAULT_BORDER_COLOR.to_string(),
            width: DEFAULT_BORDER_WIDTH,
            dash: DEFAULT_BORDER_DASH,
        }
    }

    pub fn selected() -> Self {
        Self {
            color: SELECTED_BORDER_COLOR.to_string(),
            width: SELECTED_BORDER_WIDTH,
            dash: DEFAULT_BORDER_DASH,
        }
    }
}

/// Border style per band, then per wedge.
pub type BorderDatasets = Vec<Vec<BorderStyle>>;

/// Live state of the polar density chart: grid, interval table, the current
/// highlight and the latest frame with its borders.
#[derive(Debug, Clone)]
pub struct DensityChart {
    grid: PolarGrid,
    intervals: IntervalTable,
    highlighted: Option<MobileId>,
    frame: DensityFrame,
    borders: BorderDatasets,
}

impl DensityChart {
    pub fn new(grid: PolarGrid, intervals: IntervalTable) -> Self {
        let mut chart = Self {
            grid,
            intervals,
            highlighted: None,
            frame: DensityFrame::default(),
            borders: Vec::new(),
        };
        chart.reset_datasets();
        chart
    }

    pub fn grid(&self) -> &PolarGrid {
        &self.grid
    }

    pub fn intervals(&self) -> &IntervalTable {
        &self.intervals
    }

    pub fn frame(&self) -> &DensityFrame {
        &self.frame
    }

    pub fn border_datasets(&self) -> &BorderDatasets {
        &self.borders
    }

    pub fn highlighted(&self) -> Option<MobileId> {
        self.highlighted
    }

    pub fn recompute(&mut self, candidates: Vec<BinCandidate>) -> &DensityFrame {
        self.frame = bin(&self.grid, &self.intervals, candidates, self.highlighted);
        self.borders = self.derived_borders();
        &self.frame
    }

    /// Toggle the highlight: the same id twice clears it. Occupancy and
    /// colors are left alone.
    pub fn select_mobile(&mut self, id: MobileId) -> Option<MobileId> {
        self.highlighted = if self.highlighted == Some(id) { None } else { Some(id) };
        self.frame.highlight(self.highlighted);
        match self.highlighted {
            Some(_) => self.borders = self.derived_borders(),
            None => self.reset_border_datasets(),
        }
        self.highlighted
    }

    pub fn clear_highlight(&mut self) {
        if let Some(id) = self.highlighted {
            self.select_mobile(id);
        }
    }

    /// Overlay externally computed borders, band by band and wedge by wedge.
    /// Entries beyond the current grid are ignored.
    pub fn update_border_datasets(&mut self, borders: &[Vec<BorderStyle>]) {
        for (row, update) in self.borders.iter_mut().zip(borders) {
            for (style, new_style) in row.iter_mut().zip(update) {
                *style = new_style.clone();
            }
        }
    }

    pub fn reset_border_datasets(&mut self) {
        self.borders = self.plain_borders();
    }

    pub fn set_radius(&mut self, radius_m: f64) {
        self.grid.radius_m = radius_m;
        self.reset_datasets();
    }

    pub fn set_band_count(&mut self, band_count: usize) {
        self.grid.band_count = band_count;
        self.reset_datasets();
    }

    pub fn set_wedge_count(&mut self, wedge_count: usize) {
        self.grid.wedge_count = wedge_count;
        self.reset_datasets();
    }

    pub fn set_zoom_ratio(&mut self, zoom_ratio: f64) {
        self.grid.zoom_ratio = zoom_ratio;
        self.reset_datasets();
    }

    /// New interval breakpoints apply from the next recompute.
    pub fn set_distribution(&mut self, boundaries: &[u32]) -> DomainResult<()> {
        self.intervals.redistribute(boundaries)
    }

    fn reset_datasets(&mut self) {
        self.frame = DensityFrame::empty(&self.grid, &self.intervals);
        self.borders = self.plain_borders();
    }

    fn plain_borders(&self) -> BorderDatasets {
        self.frame
            .bands
            .iter()
            .map(|row| vec![BorderStyle::plain(); row.cells.len()])
            .collect()
    }

    fn derived_borders(&self) -> BorderDatasets {
        self.frame
            .bands
            .iter()
            .enumerate()
            .map(|(band, row)| {
                (0..row.cells.len())
                    .map(|wedge| {
                        if self.frame.highlighted_cell == Some((band, wedge)) {
                            BorderStyle::selected()
                        } else {
                            BorderStyle::plain()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
