use std::{
    fmt,
    str::FromStr,
    sync::{OnceLock, RwLock},
};

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::logger::error::LoggerError;

/// Process-wide cache of the local UTC offset.
static LOCAL_OFFSET: RwLock<UtcOffset> = RwLock::new(UtcOffset::UTC);

/// Set once detection has been attempted.
static DETECTED: OnceLock<()> = OnceLock::new();

/// Timezone used for log timestamps.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoggerTimeZone {
    Utc,
    Local,
}

impl Default for LoggerTimeZone {
    fn default() -> Self {
        Self::Utc
    }
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerTimeZone::Utc => "utc",
            LoggerTimeZone::Local => "local",
        })
    }
}

/// Detects and caches the local UTC offset.
///
/// **Call in `main()` before building the tokio runtime.** Offset detection is refused by
/// `time` once other threads exist on most Unix platforms; on failure UTC is kept.
///
/// # Example
/// ```no_run
/// fn main() {
///     fdbvault_observe::init_local_offset();
///     // build the runtime afterwards
/// }
/// ```
pub fn init_local_offset() {
    let _ = DETECTED.get_or_init(detect);
}

/// Returns the cached local offset, detecting it on first use.
///
/// Used both for log timestamps and for the run's timestamp label.
pub fn local_offset() -> UtcOffset {
    let _ = DETECTED.get_or_init(detect);
    LOCAL_OFFSET
        .read()
        .map(|guard| *guard)
        .unwrap_or(UtcOffset::UTC)
}

fn detect() {
    match UtcOffset::current_local_offset() {
        Ok(offset) => {
            if let Ok(mut guard) = LOCAL_OFFSET.write() {
                *guard = offset;
            }
        }
        Err(_) => {
            eprintln!(
                "WARNING: fdbvault-observe could not detect the local timezone; \
                 call init_local_offset() before starting the runtime. Falling back to UTC."
            );
        }
    }
}

/// Formats offset as `UTC±HH` or `UTC±HH:MM`.
pub fn format_offset(offset: UtcOffset) -> String {
    let hours = offset.whole_hours();
    let minutes = offset.minutes_past_hour();
    if minutes == 0 {
        format!("UTC{hours:+03}")
    } else {
        format!("UTC{hours:+03}:{:02}", minutes.abs())
    }
}
