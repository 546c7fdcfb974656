use std::path::Path;

use async_trait::async_trait;
use fdbvault_core::{OwnershipFixer, ToolError, ToolResult};
use tracing::debug;

use crate::utils::{chown_tree, lookup_gid, lookup_uid};

/// Changes ownership with `chown(2)`/`lchown(2)` on a blocking thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChownOwnershipFixer;

#[async_trait]
impl OwnershipFixer for ChownOwnershipFixer {
    async fn chown(&self, dir: &Path, owner: &str, group: &str, recursive: bool) -> ToolResult<()> {
        let uid = lookup_uid(owner)?;
        let gid = lookup_gid(group)?;

        let root = dir.to_path_buf();
        let changed = tokio::task::spawn_blocking(move || chown_tree(&root, uid, gid, recursive))
            .await
            .map_err(|e| ToolError::Io(format!("chown task failed: {e}")))??;

        debug!(dir = %dir.display(), uid, gid, recursive, changed, "ownership changed");
        Ok(())
    }
}
