mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

mod flag;
pub use flag::Flag;

mod tags;
pub use tags::Tags;

mod timestamp;
pub use timestamp::TimestampLabel;

mod constants;
pub use constants::{DEFAULT_CONFIG_PATH, DEFAULT_TAGS};
pub(crate) use constants::*;

/// Timeout or delay value in milliseconds.
///
/// Used wherever the configuration carries an explicit time bound for an external call.
pub type TimeoutMs = u64;
