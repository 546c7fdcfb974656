//! Capabilities the pipeline needs from the outside world.
//!
//! Each external collaborator (process listing, `fdbbackup`, `tar`, the object store, the
//! monitoring service, file ownership) sits behind one trait. `fdbvault-exec` and
//! `fdbvault-notify` provide the production implementations; tests use in-memory fakes.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fdbvault_model::NotificationEvent;

use crate::error::ToolResult;

mod exit;
pub use exit::ExitInfo;

mod process;
pub use process::agent_present;

/// Produces a full process listing (one process per line, `ps aux` layout).
#[async_trait]
pub trait ProcessLister: Send + Sync {
    async fn list(&self) -> ToolResult<String>;
}

/// Changes ownership of the backup directory.
#[async_trait]
pub trait OwnershipFixer: Send + Sync {
    /// Re-own `dir` (and everything below it when `recursive`) to `owner:group`.
    async fn chown(&self, dir: &Path, owner: &str, group: &str, recursive: bool) -> ToolResult<()>;
}

/// Starts a backup and exposes its output as a stream of lines.
#[async_trait]
pub trait BackupTool: Send + Sync {
    async fn start(&self, cluster_file: &Path, target_dir: &Path)
    -> ToolResult<Box<dyn BackupStream>>;
}

/// Output of one running backup.
///
/// Lines are delivered as the tool produces them. The stream is consumed once: read with
/// [`BackupStream::next_line`] until `None`, then call [`BackupStream::finish`] exactly once
/// for the final exit status.
#[async_trait]
pub trait BackupStream: Send {
    /// Next output line without its trailing newline, or `None` once the output is exhausted.
    async fn next_line(&mut self) -> ToolResult<Option<String>>;

    /// Final exit status of the backup.
    async fn finish(&mut self) -> ToolResult<ExitInfo>;
}

/// Packs a directory into a compressed archive.
#[async_trait]
pub trait Archiver: Send + Sync {
    /// Archive the contents of `dir` into `dir/<archive_name>` and return the archive's path.
    async fn archive(&self, dir: &Path, archive_name: &str) -> ToolResult<PathBuf>;
}

/// Uploads a local file to an object URL.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, file: &Path, url: &str, region: &str) -> ToolResult<()>;
}

/// Delivers one event to the monitoring service.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &NotificationEvent) -> ToolResult<()>;
}
