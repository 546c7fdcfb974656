use std::path::Path;

use async_trait::async_trait;
use fdbvault_core::{BackupStream, BackupTool, ToolResult};
use fdbvault_model::{BackupConfig, Env};

use crate::subprocess::{ChainedStream, CommandSpec, LogConfig};

/// Runs `fdbbackup start` and, if it succeeds, `fdbbackup wait`, both against the same cluster file.
#[derive(Debug, Clone)]
pub struct FdbBackupTool {
    bin: String,
    start_args: Vec<String>,
    env: Env,
    log: LogConfig,
}

impl FdbBackupTool {
    pub fn from_config(cfg: &BackupConfig) -> Self {
        Self {
            bin: cfg.fdbbackup_bin.clone(),
            start_args: cfg.start_args.clone(),
            env: cfg.env.clone(),
            log: LogConfig::default(),
        }
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    fn commands(&self, cluster_file: &Path, target_dir: &Path) -> [CommandSpec; 2] {
        let cluster = cluster_file.display().to_string();
        let start = CommandSpec::new(&self.bin)
            .arg("-C")
            .arg(cluster.clone())
            .arg("start")
            .arg("-d")
            .arg(target_dir.display().to_string())
            .args(self.start_args.iter().cloned())
            .envs(&self.env);
        let wait = CommandSpec::new(&self.bin)
            .arg("-C")
            .arg(cluster)
            .arg("wait")
            .envs(&self.env);
        [start, wait]
    }
}

#[async_trait]
impl BackupTool for FdbBackupTool {
    async fn start(
        &self,
        cluster_file: &Path,
        target_dir: &Path,
    ) -> ToolResult<Box<dyn BackupStream>> {
        let stream = ChainedStream::new(self.commands(cluster_file, target_dir), self.log)?;
        Ok(Box::new(stream))
    }
}
