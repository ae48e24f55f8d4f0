pub mod filter;
pub mod geometry;
pub mod projector;
pub mod selection;

pub use filter::*;
pub use projector::*;
pub use selection::*;
