use std::{io, path::PathBuf};

use fdbvault_core::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("unknown user '{0}'")]
    UnknownUser(String),

    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    #[error("account lookup for '{name}' failed: {source}")]
    Lookup {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("chown '{}' failed: {source}", path.display())]
    Chown {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<ExecError> for ToolError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::Spawn { program, source } => ToolError::Spawn {
                program,
                reason: source.to_string(),
            },
            ExecError::UnknownUser(_) | ExecError::UnknownGroup(_) | ExecError::Lookup { .. } => {
                ToolError::Account(e.to_string())
            }
            ExecError::InvalidCommand(_) | ExecError::Chown { .. } | ExecError::Io(_) => {
                ToolError::Io(e.to_string())
            }
        }
    }
}
