use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    Env, ModelResult, TimeoutMs, TimestampLabel,
    config::require_non_empty,
    domain::{
        DEFAULT_AWS_BIN, DEFAULT_BUCKET, DEFAULT_INTERVALS_PREFIX, DEFAULT_LATEST_KEY,
        DEFAULT_REGION, DEFAULT_RETRY_DELAY_MS,
    },
};

/// Where archives are uploaded and how the `aws` CLI is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket name or URL. `s3://` is prepended when no scheme is given.
    pub bucket: String,
    pub region: String,
    /// Object key overwritten on every successful run.
    pub latest_key: String,
    /// Key prefix under which timestamped copies are retained.
    pub intervals_prefix: String,
    /// Path or name of the `aws` binary.
    pub aws_bin: String,
    /// Delay before the single retry of a failed upload.
    pub retry_delay_ms: TimeoutMs,
    /// Extra environment for the `aws` CLI (e.g. `AWS_PROFILE`).
    pub env: Env,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            latest_key: DEFAULT_LATEST_KEY.to_string(),
            intervals_prefix: DEFAULT_INTERVALS_PREFIX.to_string(),
            aws_bin: DEFAULT_AWS_BIN.to_string(),
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            env: Env::new(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> ModelResult<()> {
        require_non_empty("storage.bucket", &self.bucket)?;
        require_non_empty("storage.region", &self.region)?;
        require_non_empty("storage.latest_key", &self.latest_key)?;
        require_non_empty("storage.aws_bin", &self.aws_bin)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Bucket as an `s3://` URL without trailing slash.
    pub fn bucket_url(&self) -> String {
        let bucket = self.bucket.trim().trim_end_matches('/');
        if bucket.contains("://") {
            bucket.to_string()
        } else {
            format!("s3://{bucket}")
        }
    }

    /// Full URL of the "latest" copy.
    pub fn latest_url(&self) -> String {
        self.object_url(&self.latest_key)
    }

    /// Object key of the retained copy for one run.
    pub fn interval_key(&self, label: &TimestampLabel) -> String {
        let prefix = self.intervals_prefix.trim_matches('/');
        if prefix.is_empty() {
            label.archive_name()
        } else {
            format!("{prefix}/{}", label.archive_name())
        }
    }

    /// Full URL of the retained copy for one run.
    pub fn interval_url(&self, label: &TimestampLabel) -> String {
        self.object_url(&self.interval_key(label))
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.bucket_url(), key.trim_start_matches('/'))
    }
}
