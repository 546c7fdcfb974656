//! Spawning external commands with `tokio::process`.
//!
//! Two shapes are supported: [`run_captured`] for short commands whose whole output is needed
//! at once, and [`ChainedStream`] for long-running commands whose stdout is consumed line by
//! line while it is produced.
mod command;
pub use command::CommandSpec;

mod logger;
pub use logger::LogConfig;

mod lines;

mod capture;
pub use capture::{Captured, run_captured};

mod chain;
pub use chain::ChainedStream;
