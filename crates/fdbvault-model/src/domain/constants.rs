//! Well-known defaults for a FoundationDB host.
//!
//! These mirror the paths and names a stock `foundationdb` package install uses,
//! so an empty configuration (credentials aside) backs up the local cluster.

/// Relative path of the configuration file holding the Datadog credentials.
pub const DEFAULT_CONFIG_PATH: &str = "./fdb.dd.yaml";

/// Tags attached to every notification unless overridden.
pub const DEFAULT_TAGS: [&str; 3] = ["fdb", "production", "backup"];

pub(crate) const DEFAULT_CLUSTER_FILE: &str = "/etc/foundationdb/fdb.cluster";
pub(crate) const DEFAULT_BACKUP_DIR: &str = "/etc/foundationdb/restore";
pub(crate) const DEFAULT_SERVICE_ACCOUNT: &str = "foundationdb";
pub(crate) const DEFAULT_AGENT_PROCESS: &str = "backup_agent";
pub(crate) const DEFAULT_COMPLETION_MARKER: &str = "complete";
pub(crate) const DEFAULT_FDBBACKUP_BIN: &str = "fdbbackup";

pub(crate) const DEFAULT_BUCKET: &str = "s3://YER_s3_Bucket";
pub(crate) const DEFAULT_REGION: &str = "us-west-2";
pub(crate) const DEFAULT_LATEST_KEY: &str = "latest/foundationdb-latest.tar";
pub(crate) const DEFAULT_INTERVALS_PREFIX: &str = "intervals";
pub(crate) const DEFAULT_AWS_BIN: &str = "aws";
pub(crate) const DEFAULT_RETRY_DELAY_MS: u64 = 5_000;

pub(crate) const DEFAULT_DATADOG_SITE: &str = "https://api.datadoghq.com";
