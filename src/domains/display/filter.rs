use crate::domains::mobile::{Mobile, MobileColor, MobileShape};
use std::collections::HashSet;

/// Category filter chosen by the operator. A mobile is shown only when both
/// its color and its shape are enabled; unknown or missing categories never are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayFilter {
    hidden_colors: HashSet<MobileColor>,
    hidden_shapes: HashSet<MobileShape>,
}

impl DisplayFilter {
    pub fn show_all() -> Self {
        Self::default()
    }

    pub fn set_color(&mut self, color: MobileColor, enabled: bool) {
        if enabled {
            self.hidden_colors.remove(&color);
        } else {
            self.hidden_colors.insert(color);
        }
    }

    pub fn set_shape(&mut self, shape: MobileShape, enabled: bool) {
        if enabled {
            self.hidden_shapes.remove(&shape);
        } else {
            self.hidden_shapes.insert(shape);
        }
    }

    pub fn color_enabled(&self, color: MobileColor) -> bool {
        color != MobileColor::Unknown && !self.hidden_colors.contains(&color)
    }

    pub fn shape_enabled(&self, shape: MobileShape) -> bool {
        shape != MobileShape::Unknown && !self.hidden_shapes.contains(&shape)
    }

    pub fn allows(&self, mobile: &Mobile) -> bool {
        let color_ok = mobile.color.map_or(false, |color| self.color_enabled(color));
        let shape_ok = mobile.shape.map_or(false, |shape| self.shape_enabled(shape));
        color_ok && shape_ok
    }
}
