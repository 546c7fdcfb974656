//! Delivery of run events to the Datadog events API.
mod error;
pub use error::NotifyError;

mod payload;
pub use payload::{DatadogEvent, MAX_TEXT_CHARS};

mod datadog;
pub use datadog::DatadogNotifier;
