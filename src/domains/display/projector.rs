use super::filter::DisplayFilter;
use super::geometry::{
    diamond_points, distance_from_origin, radians_to_degrees, round_two, segment_end,
    square_top_left, triangle_points, Point,
};
use crate::domains::mobile::{Mobile, MobileId, MobileShape};
use serde::Serialize;

/// Half-width of the display plane, in display units.
pub const PLANE_SCALE: f64 = 250.0;
pub const HEADING_ARROW_LENGTH: f64 = 12.0;
pub const ORIENTATION_TICK_LENGTH: f64 = 9.0;
pub const SQUARE_SIDE: f64 = 10.0;
pub const TRIANGLE_SIDE: f64 = 10.0;
pub const DIAMOND_SIDE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeGeometry {
    /// Drawn as a fixed-radius dot at the center.
    Circle,
    Square { top_left: Point },
    Triangle { points: [Point; 3] },
    Diamond { points: [Point; 4] },
    /// Unknown or missing shape: nothing beyond the center.
    Bare,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobileGeometry {
    pub center: Point,
    pub shape: ShapeGeometry,
    pub heading_end: Point,
    pub orientation_end: Point,
}

/// Rounded values shown for the selected mobile only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedReadout {
    pub heading_deg: f64,
    pub orientation_deg: f64,
    pub spinning_speed_deg_s: f64,
    pub speed_m_s: f64,
    pub x_m: f64,
    pub y_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobileDisplay {
    pub id: MobileId,
    pub is_displayed: bool,
    pub is_out_of_range: bool,
    pub is_selected: bool,
    pub geometry: Option<MobileGeometry>,
    pub readout: Option<SelectedReadout>,
}

impl MobileDisplay {
    /// Shown and inside the zoomed range; only these feed the density grid.
    pub fn is_eligible(&self) -> bool {
        self.is_displayed && !self.is_out_of_range
    }
}

/// One projection cycle, index-aligned with the mobile slice it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayFrame {
    pub mobiles: Vec<MobileDisplay>,
}

impl DisplayFrame {
    pub fn get(&self, id: MobileId) -> Option<&MobileDisplay> {
        self.mobiles.iter().find(|m| m.id == id)
    }

    pub fn displayed_count(&self) -> usize {
        self.mobiles.iter().filter(|m| m.is_displayed).count()
    }

    pub fn eligible_count(&self) -> usize {
        self.mobiles.iter().filter(|m| m.is_eligible()).count()
    }
}

/// Turns native kinematics into display-plane geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryProjector {
    pub max_range_m: f64,
    pub zoom_ratio: f64,
}

impl GeometryProjector {
    pub fn new(max_range_m: f64) -> Self {
        Self {
            max_range_m,
            zoom_ratio: 1.0,
        }
    }

    pub fn with_zoom_ratio(mut self, zoom_ratio: f64) -> Self {
        self.zoom_ratio = zoom_ratio;
        self
    }

    pub fn zoomed_range(&self) -> f64 {
        self.max_range_m * self.zoom_ratio
    }

    pub fn project_point(&self, x_m: f64, y_m: f64) -> Point {
        let range = self.zoomed_range();
        Point::new(x_m * PLANE_SCALE / range, y_m * PLANE_SCALE / range)
    }

    pub fn is_out_of_range(&self, x_m: f64, y_m: f64) -> bool {
        distance_from_origin(x_m, y_m) > self.zoomed_range()
    }

    pub fn geometry(&self, mobile: &Mobile) -> MobileGeometry {
        let kinematics = &mobile.kinematics;
        let center = self.project_point(kinematics.x_m, kinematics.y_m);
        let shape = match mobile.shape {
            Some(MobileShape::Circle) => ShapeGeometry::Circle,
            Some(MobileShape::Square) => ShapeGeometry::Square {
                top_left: square_top_left(center, SQUARE_SIDE),
            },
            Some(MobileShape::Triangle) => ShapeGeometry::Triangle {
                points: triangle_points(center, TRIANGLE_SIDE),
            },
            Some(MobileShape::Diamond) => ShapeGeometry::Diamond {
                points: diamond_points(center, DIAMOND_SIDE),
            },
            Some(MobileShape::Unknown) | None => ShapeGeometry::Bare,
        };
        MobileGeometry {
            center,
            shape,
            heading_end: segment_end(center, HEADING_ARROW_LENGTH, kinematics.heading_rad),
            orientation_end: segment_end(center, ORIENTATION_TICK_LENGTH, kinematics.orientation_rad),
        }
    }

    pub fn readout(&self, mobile: &Mobile) -> SelectedReadout {
        let kinematics = &mobile.kinematics;
        SelectedReadout {
            heading_deg: round_two(Some(radians_to_degrees(kinematics.heading_rad))),
            orientation_deg: round_two(Some(radians_to_degrees(kinematics.orientation_rad))),
            spinning_speed_deg_s: round_two(Some(radians_to_degrees(kinematics.spinning_speed_rad_s))),
            speed_m_s: round_two(kinematics.speed_m_s),
            x_m: round_two(Some(kinematics.x_m)),
            y_m: round_two(Some(kinematics.y_m)),
        }
    }

    pub fn project_mobile(
        &self,
        mobile: &Mobile,
        filter: &DisplayFilter,
        selected: Option<MobileId>,
    ) -> MobileDisplay {
        let is_selected = selected == Some(mobile.id);
        let mut display = MobileDisplay {
            id: mobile.id,
            is_displayed: filter.allows(mobile),
            is_out_of_range: false,
            is_selected,
            geometry: None,
            readout: None,
        };
        if !display.is_displayed {
            return display;
        }

        display.is_out_of_range = self.is_out_of_range(mobile.kinematics.x_m, mobile.kinematics.y_m);
        if !display.is_out_of_range {
            display.geometry = Some(self.geometry(mobile));
            if is_selected {
                display.readout = Some(self.readout(mobile));
            }
        }
        display
    }

    pub fn project(
        &self,
        mobiles: &[Mobile],
        filter: &DisplayFilter,
        selected: Option<MobileId>,
    ) -> DisplayFrame {
        DisplayFrame {
            mobiles: mobiles
                .iter()
                .map(|mobile| self.project_mobile(mobile, filter, selected))
                .collect(),
        }
    }

    /// Move the selection flag and readout inside an existing frame without
    /// projecting the rest of the population again.
    pub fn reselect(&self, frame: &mut DisplayFrame, mobiles: &[Mobile], selected: Option<MobileId>) {
        for (display, mobile) in frame.mobiles.iter_mut().zip(mobiles) {
            let is_selected = selected == Some(display.id);
            if is_selected && display.geometry.is_some() {
                display.readout = Some(self.readout(mobile));
            } else if !is_selected {
                display.readout = None;
            }
            display.is_selected = is_selected;
        }
    }
}
