use std::path::Path;

use async_trait::async_trait;
use fdbvault_core::{ObjectStore, ToolResult};
use fdbvault_model::{Env, StorageConfig};

use crate::subprocess::{CommandSpec, run_captured};

/// Uploads with `aws s3 cp`.
#[derive(Debug, Clone)]
pub struct AwsS3Store {
    bin: String,
    env: Env,
}

impl AwsS3Store {
    pub fn from_config(cfg: &StorageConfig) -> Self {
        Self {
            bin: cfg.aws_bin.clone(),
            env: cfg.env.clone(),
        }
    }

    fn command(&self, file: &Path, url: &str, region: &str) -> CommandSpec {
        CommandSpec::new(&self.bin)
            .args(["s3", "cp"])
            .arg(file.display().to_string())
            .arg(url)
            .arg("--region")
            .arg(region)
            .envs(&self.env)
    }
}

#[async_trait]
impl ObjectStore for AwsS3Store {
    async fn upload(&self, file: &Path, url: &str, region: &str) -> ToolResult<()> {
        run_captured(&self.command(file, url, region))
            .await?
            .check(&self.bin)?;
        Ok(())
    }
}
