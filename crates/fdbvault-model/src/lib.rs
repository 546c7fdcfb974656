mod domain;
pub use domain::{DEFAULT_CONFIG_PATH, DEFAULT_TAGS};
pub use domain::{Env, Flag, KeyValue, Tags, TimeoutMs, TimestampLabel};

mod error;
pub use error::{ModelError, ModelResult};

mod event;
pub use event::{AlertType, NotificationEvent, Priority};

mod config;
pub use config::{
    BackupConfig, DatadogConfig, JobConfig, JobOverrides, NotifyConfig, StageTimeouts,
    StorageConfig, load_yaml,
};
