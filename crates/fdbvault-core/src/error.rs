use std::fmt;

use thiserror::Error;

/// Error returned by a capability (external tool, HTTP endpoint, filesystem call).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("failed to spawn '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("'{program}' failed ({status}): {detail}")]
    Failed {
        program: String,
        status: String,
        detail: String,
    },

    #[error("'{program}' timed out after {after_ms} ms")]
    Timeout { program: String, after_ms: u64 },

    #[error("account lookup failed: {0}")]
    Account(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

impl From<std::io::Error> for ToolError {
    fn from(e: std::io::Error) -> Self {
        ToolError::Io(e.to_string())
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Pipeline stage, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Permissions,
    Archive,
    Upload,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Permissions => "permissions",
            Stage::Archive => "archive",
            Stage::Upload => "upload",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capability failure attributed to the stage that hit it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: ToolError,
}

impl StageError {
    pub fn new(stage: Stage, source: ToolError) -> Self {
        Self { stage, source }
    }
}
