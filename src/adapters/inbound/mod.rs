pub mod channel_source;
pub mod file_envelope_source;
pub mod websocket_source;

pub use channel_source::*;
pub use file_envelope_source::*;
pub use websocket_source::*;
