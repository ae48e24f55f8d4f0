pub mod aggregate;
pub mod events;
pub mod patch;
pub mod subscriptions;

pub use aggregate::*;
pub use events::*;
pub use patch::*;
pub use subscriptions::*;
