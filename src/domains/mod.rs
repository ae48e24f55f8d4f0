pub mod density;
pub mod display;
pub mod mobile;
pub mod notifier;
pub mod settings;

pub use density::*;
pub use display::*;
pub use mobile::*;
pub use notifier::*;
pub use settings::*;
