pub mod buffered_notifier;
pub mod console_notifier;
pub mod multi_notifier;
pub mod noop_notifier;
pub mod settings_api;
pub mod tracing_notifier;

pub use buffered_notifier::*;
pub use console_notifier::*;
pub use multi_notifier::*;
pub use noop_notifier::*;
pub use settings_api::*;
pub use tracing_notifier::*;
