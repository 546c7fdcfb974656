//! Job configuration schema and loading.
//!
//! Everything except the Datadog credentials has a default, so the smallest valid file is:
//!
//! ```yaml
//! datadog:
//!   api_key: "<api key>"
//!   app_key: "<application key>"
//! ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{ModelError, ModelResult, Tags};

mod backup;
pub use backup::BackupConfig;

mod datadog;
pub use datadog::DatadogConfig;

mod storage;
pub use storage::StorageConfig;

mod timeouts;
pub use timeouts::StageTimeouts;

/// Notification settings shared by every event of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Tags attached to every event.
    pub tags: Tags,
}

/// Complete configuration of one backup job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Monitoring-service credentials. Required.
    pub datadog: DatadogConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub timeouts: StageTimeouts,
}

/// Values that take precedence over the configuration file.
///
/// Usually filled from `CLUSTER_FILE`, `BACKUP_DIR`, `S3_BUCKET` and `AWS_REGION`.
#[derive(Debug, Clone, Default)]
pub struct JobOverrides {
    pub cluster_file: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub bucket: Option<String>,
    pub region: Option<String>,
}

impl JobConfig {
    /// Apply overrides in place. `None` values keep the current setting.
    pub fn apply_overrides(&mut self, overrides: &JobOverrides) {
        if let Some(path) = &overrides.cluster_file {
            self.backup.cluster_file = path.clone();
        }
        if let Some(dir) = &overrides.backup_dir {
            self.backup.dir = dir.clone();
        }
        if let Some(bucket) = &overrides.bucket {
            self.storage.bucket = bucket.clone();
        }
        if let Some(region) = &overrides.region {
            self.storage.region = region.clone();
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> ModelResult<()> {
        self.datadog.validate()?;
        self.backup.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Copy of the configuration safe to print (credentials masked).
    pub fn redacted(&self) -> Self {
        Self {
            datadog: self.datadog.redacted(),
            ..self.clone()
        }
    }
}

/// Read a YAML document from `path` into `T`.
///
/// A missing file is reported as [`ModelError::ConfigMissing`] so callers can tell it apart from
/// unreadable or malformed files.
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> ModelResult<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ModelError::ConfigMissing(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ModelError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ModelError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> ModelResult<()> {
    if value.trim().is_empty() {
        return Err(ModelError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}
