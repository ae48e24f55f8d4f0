pub mod annotations;
pub mod binner;
pub mod chart;
pub mod grid;
pub mod intervals;

pub use annotations::*;
pub use binner::*;
pub use chart::*;
pub use grid::*;
pub use intervals::*;
