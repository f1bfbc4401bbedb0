mod error;
mod streaming_registration;

pub use error::StreamingError;
pub use streaming_registration::{StreamingEvent, StreamingRegistration, StreamingSignal};
