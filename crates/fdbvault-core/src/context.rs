use std::{fmt, path::Path, sync::Arc};

use fdbvault_model::{JobConfig, StageTimeouts, Tags, TimestampLabel};
use tracing::{Span, info_span};

/// Everything one run needs, built once at startup and passed to every stage.
///
/// Holds the validated configuration, the run's timestamp label, and the tracing span all
/// stage logs are recorded under.
#[derive(Clone)]
pub struct RunContext {
    config: Arc<JobConfig>,
    label: TimestampLabel,
    span: Span,
}

impl RunContext {
    /// Create a context; opens a `backup_run` span tagged with the label.
    pub fn new(config: Arc<JobConfig>, label: TimestampLabel) -> Self {
        let span = info_span!("backup_run", label = %label);
        Self {
            config,
            label,
            span,
        }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    pub fn label(&self) -> &TimestampLabel {
        &self.label
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn backup_dir(&self) -> &Path {
        &self.config.backup.dir
    }

    pub fn cluster_file(&self) -> &Path {
        &self.config.backup.cluster_file
    }

    pub fn tags(&self) -> &Tags {
        &self.config.notify.tags
    }

    pub fn timeouts(&self) -> &StageTimeouts {
        &self.config.timeouts
    }

    /// Archive file name for this run.
    pub fn archive_name(&self) -> String {
        self.label.archive_name()
    }

    /// Destination of the overwritten "latest" copy.
    pub fn latest_url(&self) -> String {
        self.config.storage.latest_url()
    }

    /// Destination of this run's retained copy.
    pub fn interval_url(&self) -> String {
        self.config.storage.interval_url(&self.label)
    }
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("label", &self.label)
            .field("backup_dir", &self.backup_dir())
            .field("cluster_file", &self.cluster_file())
            .finish()
    }
}
