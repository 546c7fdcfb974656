use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fdbvault_core::{Archiver, ToolResult};

use crate::subprocess::{CommandSpec, run_captured};

/// Archives a directory into a gzip-compressed tarball inside that same directory.
#[derive(Debug, Clone)]
pub struct TarArchiver {
    bin: String,
}

impl TarArchiver {
    pub fn new() -> Self {
        Self { bin: "tar".into() }
    }

    fn command(&self, dir: &Path, archive_name: &str) -> CommandSpec {
        CommandSpec::new(&self.bin)
            .arg("-czf")
            .arg(dir.join(archive_name).display().to_string())
            .arg(format!("--exclude=./{archive_name}"))
            .arg("-C")
            .arg(dir.display().to_string())
            .arg(".")
    }
}

impl Default for TarArchiver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Archiver for TarArchiver {
    async fn archive(&self, dir: &Path, archive_name: &str) -> ToolResult<PathBuf> {
        run_captured(&self.command(dir, archive_name))
            .await?
            .check(&self.bin)?;
        Ok(dir.join(archive_name))
    }
}
