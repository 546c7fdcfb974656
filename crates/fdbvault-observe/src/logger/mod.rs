mod config;
mod error;
mod logger;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::LoggerFormat;
pub use object::LoggerLevel;
pub use object::{LoggerTimeZone, format_offset, init_local_offset, local_offset};

/// Initializes the global tracing subscriber with the given configuration.
///
/// Installs the console (or journald) output selected by [`LoggerConfig::format`] and, when
/// [`LoggerConfig::file`] is set, an additional plain-text layer appending to that file.
///
/// # Important: Local Timezone
/// For using `LoggerTimeZone::Local`, call [`init_local_offset`] in `main()` before the tokio
/// runtime is built.
///
/// # Examples
/// ```rust
/// use fdbvault_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("logger");
///
/// tracing::info!("logger initialized");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => logger::logger_text(cfg),
        LoggerFormat::Json => logger::logger_json(cfg),
        LoggerFormat::Journald => logger::logger_journald(cfg),
    }
}
