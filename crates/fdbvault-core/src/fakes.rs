//! In-memory capabilities for pipeline tests.
use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use fdbvault_model::{DatadogConfig, JobConfig, NotificationEvent};

use crate::{
    error::{ToolError, ToolResult},
    pipeline::Capabilities,
    ports::{
        Archiver, BackupStream, BackupTool, ExitInfo, Notifier, ObjectStore, OwnershipFixer,
        ProcessLister,
    },
};

/// Default job configuration staged in `dir`.
pub(crate) fn job_config(dir: impl AsRef<Path>) -> JobConfig {
    let mut cfg = JobConfig {
        datadog: DatadogConfig {
            api_key: "api".into(),
            app_key: "app".into(),
            site: "https://api.datadoghq.com".into(),
            timeout_ms: 10_000,
        },
        backup: Default::default(),
        storage: Default::default(),
        notify: Default::default(),
        timeouts: Default::default(),
    };
    cfg.backup.dir = dir.as_ref().to_path_buf();
    cfg
}

fn injected(slot: &Mutex<Option<ToolError>>) -> ToolResult<()> {
    match slot.lock().unwrap().clone() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[derive(Default)]
pub(crate) struct FakeLister {
    listing: String,
    error: Mutex<Option<ToolError>>,
}

impl FakeLister {
    pub(crate) fn fail_with(&self, err: ToolError) {
        *self.error.lock().unwrap() = Some(err);
    }
}

#[async_trait]
impl ProcessLister for FakeLister {
    async fn list(&self) -> ToolResult<String> {
        injected(&self.error)?;
        Ok(self.listing.clone())
    }
}

#[derive(Default)]
pub(crate) struct FakeOwnership {
    pub(crate) calls: Mutex<Vec<(PathBuf, String, String, bool)>>,
    error: Mutex<Option<ToolError>>,
}

impl FakeOwnership {
    pub(crate) fn fail_with(&self, err: ToolError) {
        *self.error.lock().unwrap() = Some(err);
    }
}

#[async_trait]
impl OwnershipFixer for FakeOwnership {
    async fn chown(&self, dir: &Path, owner: &str, group: &str, recursive: bool) -> ToolResult<()> {
        self.calls.lock().unwrap().push((
            dir.to_path_buf(),
            owner.to_string(),
            group.to_string(),
            recursive,
        ));
        injected(&self.error)
    }
}

/// Replays scripted output lines, then reports a fixed exit status.
pub(crate) struct FakeBackup {
    lines: Vec<String>,
    exit: ExitInfo,
    hang: AtomicBool,
    pub(crate) starts: AtomicUsize,
}

impl FakeBackup {
    /// Block forever after the scripted lines instead of ending the stream.
    pub(crate) fn hang_after_lines(&self) {
        self.hang.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl BackupTool for FakeBackup {
    async fn start(&self, _cluster_file: &Path, _target_dir: &Path) -> ToolResult<Box<dyn BackupStream>> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            lines: self.lines.iter().cloned().collect(),
            exit: self.exit,
            hang: self.hang.load(Ordering::SeqCst),
        }))
    }
}

struct FakeStream {
    lines: VecDeque<String>,
    exit: ExitInfo,
    hang: bool,
}

#[async_trait]
impl BackupStream for FakeStream {
    async fn next_line(&mut self) -> ToolResult<Option<String>> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.hang => std::future::pending().await,
            None => Ok(None),
        }
    }

    async fn finish(&mut self) -> ToolResult<ExitInfo> {
        Ok(self.exit)
    }
}

/// Writes a small placeholder archive into the directory.
#[derive(Default)]
pub(crate) struct FakeArchiver {
    pub(crate) calls: Mutex<Vec<(PathBuf, String)>>,
    error: Mutex<Option<ToolError>>,
}

impl FakeArchiver {
    pub(crate) fn fail_with(&self, err: ToolError) {
        *self.error.lock().unwrap() = Some(err);
    }
}

#[async_trait]
impl Archiver for FakeArchiver {
    async fn archive(&self, dir: &Path, archive_name: &str) -> ToolResult<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .push((dir.to_path_buf(), archive_name.to_string()));
        injected(&self.error)?;
        let path = dir.join(archive_name);
        std::fs::write(&path, b"archive")?;
        Ok(path)
    }
}

/// Records successful uploads; the first `n` attempts can be made to fail.
#[derive(Default)]
pub(crate) struct FakeStore {
    uploaded: Mutex<Vec<String>>,
    failures_left: AtomicUsize,
    pub(crate) attempts: AtomicUsize,
}

impl FakeStore {
    pub(crate) fn fail_next(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    pub(crate) fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn upload(&self, file: &Path, url: &str, _region: &str) -> ToolResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ToolError::Failed {
                program: "aws".into(),
                status: "exit code 1".into(),
                detail: "connection reset".into(),
            });
        }
        assert!(file.is_file(), "uploading a missing archive: {}", file.display());
        self.uploaded.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeNotifier {
    events: Mutex<Vec<NotificationEvent>>,
    failing: AtomicBool,
}

impl FakeNotifier {
    pub(crate) fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub(crate) fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, event: &NotificationEvent) -> ToolResult<()> {
        self.events.lock().unwrap().push(event.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(ToolError::Delivery("HTTP 403 Forbidden".into()));
        }
        Ok(())
    }
}

/// One fake of each capability, kept around for assertions.
pub(crate) struct Harness {
    pub(crate) lister: Arc<FakeLister>,
    pub(crate) ownership: Arc<FakeOwnership>,
    pub(crate) backup: Arc<FakeBackup>,
    pub(crate) archiver: Arc<FakeArchiver>,
    pub(crate) store: Arc<FakeStore>,
    pub(crate) notifier: Arc<FakeNotifier>,
}

impl Harness {
    pub(crate) fn new(listing: &str, lines: &[&str], exit: ExitInfo) -> Self {
        Self {
            lister: Arc::new(FakeLister {
                listing: listing.to_string(),
                ..Default::default()
            }),
            ownership: Arc::default(),
            backup: Arc::new(FakeBackup {
                lines: lines.iter().map(|l| l.to_string()).collect(),
                exit,
                hang: AtomicBool::new(false),
                starts: AtomicUsize::new(0),
            }),
            archiver: Arc::default(),
            store: Arc::default(),
            notifier: Arc::default(),
        }
    }

    pub(crate) fn caps(&self) -> Capabilities {
        Capabilities {
            lister: self.lister.clone(),
            ownership: self.ownership.clone(),
            backup: self.backup.clone(),
            archiver: self.archiver.clone(),
            store: self.store.clone(),
            notifier: self.notifier.clone(),
        }
    }
}
