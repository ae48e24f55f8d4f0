pub mod event_loop;
pub mod settings_service;
pub mod sitac_service;

pub use event_loop::*;
pub use settings_service::*;
pub use sitac_service::*;
