use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("configuration file not found: {0}")]
    ConfigMissing(PathBuf),

    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    #[error("unknown alert type: {0}")]
    UnknownAlertType(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
