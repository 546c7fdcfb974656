use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    Env, Flag, ModelError, ModelResult,
    config::require_non_empty,
    domain::{
        DEFAULT_AGENT_PROCESS, DEFAULT_BACKUP_DIR, DEFAULT_CLUSTER_FILE, DEFAULT_COMPLETION_MARKER,
        DEFAULT_FDBBACKUP_BIN, DEFAULT_SERVICE_ACCOUNT,
    },
};

/// What to back up and how to drive `fdbbackup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Cluster descriptor file passed to `fdbbackup -C`.
    pub cluster_file: PathBuf,
    /// Staging directory the backup is written to, archived from, and emptied after the run.
    pub dir: PathBuf,
    /// Service account user that must own [`BackupConfig::dir`].
    pub owner: String,
    /// Service account group that must own [`BackupConfig::dir`].
    pub group: String,
    /// Re-own the whole tree instead of the directory alone.
    pub recursive_chown: Flag,
    /// Substring identifying the backup agent in the process listing.
    pub agent_process: String,
    /// Substring in the backup output that marks a finished backup.
    pub completion_marker: String,
    /// Path or name of the `fdbbackup` binary.
    pub fdbbackup_bin: String,
    /// Extra arguments appended to `fdbbackup start`.
    pub start_args: Vec<String>,
    /// Extra environment for `fdbbackup`.
    pub env: Env,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            cluster_file: PathBuf::from(DEFAULT_CLUSTER_FILE),
            dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            owner: DEFAULT_SERVICE_ACCOUNT.to_string(),
            group: DEFAULT_SERVICE_ACCOUNT.to_string(),
            recursive_chown: Flag::enabled(),
            agent_process: DEFAULT_AGENT_PROCESS.to_string(),
            completion_marker: DEFAULT_COMPLETION_MARKER.to_string(),
            fdbbackup_bin: DEFAULT_FDBBACKUP_BIN.to_string(),
            start_args: Vec::new(),
            env: Env::new(),
        }
    }
}

impl BackupConfig {
    /// Validate the section.
    ///
    /// Rules:
    /// - names and markers are not empty;
    /// - `dir` is not empty and not the filesystem root, since its contents are deleted after every run.
    pub fn validate(&self) -> ModelResult<()> {
        require_non_empty("backup.owner", &self.owner)?;
        require_non_empty("backup.group", &self.group)?;
        require_non_empty("backup.agent_process", &self.agent_process)?;
        require_non_empty("backup.completion_marker", &self.completion_marker)?;
        require_non_empty("backup.fdbbackup_bin", &self.fdbbackup_bin)?;

        if self.dir.as_os_str().is_empty() {
            return Err(ModelError::Invalid("backup.dir must not be empty".into()));
        }
        if self.dir.parent().is_none() || self.dir == Path::new("/") {
            return Err(ModelError::Invalid(format!(
                "backup.dir must not be the filesystem root: {}",
                self.dir.display()
            )));
        }
        Ok(())
    }
}
