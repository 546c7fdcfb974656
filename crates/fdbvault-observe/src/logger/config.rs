use std::{io::IsTerminal, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::logger::object::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Logger configuration.
///
/// Read from the `logger:` section of the job configuration file; every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Console output format.
    pub format: LoggerFormat,
    /// Log level filter expression (e.g., "info", "fdbvault_exec=debug,info").
    pub level: LoggerLevel,
    /// Timezone for timestamps.
    pub tz: LoggerTimeZone,
    /// Whether to include module/target names in log output.
    pub with_targets: bool,
    /// Whether to use colored console output.
    pub use_color: bool,
    /// Optional append-only log file, written in plain text next to the console output.
    pub file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::Local,
            with_targets: true,
            use_color: true,
            file: None,
        }
    }
}

impl LoggerConfig {
    /// Color is used only when enabled in config and stdout is a terminal.
    ///
    /// Jobs run from cron or a systemd timer therefore log without escape codes.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
