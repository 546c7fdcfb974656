use std::path::PathBuf;

use clap::Parser;
use fdbvault_model::{DEFAULT_CONFIG_PATH, JobOverrides};
use fdbvault_observe::{LoggerFormat, LoggerLevel};

/// Back up a FoundationDB cluster to S3 and report the result to Datadog.
#[derive(Parser, Debug)]
#[command(name = "fdbvault", version, rename_all = "kebab-case")]
pub struct Args {
    /// Configuration file (Datadog credentials and optional job settings).
    #[arg(long, short, env = "FDBVAULT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Cluster descriptor file passed to `fdbbackup -C`.
    #[arg(long, env = "CLUSTER_FILE")]
    pub cluster_file: Option<PathBuf>,

    /// Backup staging directory.
    #[arg(long, env = "BACKUP_DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Destination bucket (name or `s3://` URL).
    #[arg(long, env = "S3_BUCKET")]
    pub bucket: Option<String>,

    /// Region passed to every upload.
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Log filter expression, e.g. `info` or `fdbvault_exec=debug,info`.
    #[arg(long, env = "FDBVAULT_LOG")]
    pub log_level: Option<LoggerLevel>,

    /// Console log format: text, json or journald.
    #[arg(long)]
    pub log_format: Option<LoggerFormat>,

    /// Append logs to this file as well.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Validate the configuration, print it with credentials masked, and exit.
    #[arg(long)]
    pub check_config: bool,
}

impl Args {
    pub fn overrides(&self) -> JobOverrides {
        JobOverrides {
            cluster_file: self.cluster_file.clone(),
            backup_dir: self.backup_dir.clone(),
            bucket: self.bucket.clone(),
            region: self.region.clone(),
        }
    }
}
