//! The backup run: agent check, ownership, backup, archive, upload, notify, cleanup.
//!
//! Stages run strictly one after another. Every branch after the agent check sends exactly one
//! notification and then empties the backup directory, whatever happened before.
use std::{future::Future, path::Path, sync::Arc, time::Duration};

use fdbvault_model::NotificationEvent;
use tracing::{Instrument, debug, error, info, warn};

use crate::{
    classify::{BackupOutcome, FailureReason, OutcomeClassifier, OutputBuffer},
    cleanup::{CleanupReport, clear_directory},
    context::RunContext,
    error::{Stage, StageError, ToolError, ToolResult},
    ports::{
        Archiver, BackupTool, ExitInfo, Notifier, ObjectStore, OwnershipFixer, ProcessLister,
        agent_present,
    },
    retry::retry_once,
};

/// Normal completion, whether or not the backup itself succeeded.
pub const EXIT_OK: i32 = 0;
/// The backup agent is not running.
pub const EXIT_AGENT_MISSING: i32 = 1;
/// A supporting stage (ownership, archive, upload) failed.
pub const EXIT_STAGE_FAILED: i32 = 2;

const SUCCESS_TITLE: &str = "FDB Backup Success";
const ERROR_TITLE: &str = "FDB Backup Error";

/// The set of external collaborators a pipeline drives.
#[derive(Clone)]
pub struct Capabilities {
    pub lister: Arc<dyn ProcessLister>,
    pub ownership: Arc<dyn OwnershipFixer>,
    pub backup: Arc<dyn BackupTool>,
    pub archiver: Arc<dyn Archiver>,
    pub store: Arc<dyn ObjectStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No backup agent process was found; nothing else ran.
    AgentMissing,
    /// The backup tool did not produce a usable backup.
    BackupFailed(FailureReason),
    /// The archive was uploaded to both destinations.
    Stored { latest: String, interval: String },
    /// A supporting stage failed after the agent check.
    Aborted(StageError),
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::AgentMissing => EXIT_AGENT_MISSING,
            RunOutcome::BackupFailed(_) | RunOutcome::Stored { .. } => EXIT_OK,
            RunOutcome::Aborted(_) => EXIT_STAGE_FAILED,
        }
    }
}

/// Summary of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Everything the backup tool printed.
    pub output: OutputBuffer,
    /// Whether the run's notification was delivered.
    pub notified: bool,
    /// `None` when the run stopped before touching the backup directory.
    pub cleanup: Option<CleanupReport>,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

/// Sequential backup pipeline over a set of [`Capabilities`].
pub struct BackupPipeline {
    caps: Capabilities,
}

impl BackupPipeline {
    pub fn new(caps: Capabilities) -> Self {
        Self { caps }
    }

    /// Execute one run inside the context's span.
    pub async fn run(&self, ctx: &RunContext) -> RunReport {
        let span = ctx.span().clone();
        self.run_stages(ctx).instrument(span).await
    }

    async fn run_stages(&self, ctx: &RunContext) -> RunReport {
        info!(
            cluster_file = %ctx.cluster_file().display(),
            dir = %ctx.backup_dir().display(),
            "backup run starting",
        );

        if let Err(detail) = self.check_agent(ctx).await {
            let needle = &ctx.config().backup.agent_process;
            error!(agent = %needle, %detail, "backup agent not running; aborting run");
            let event = NotificationEvent::error(
                format!("Unable to find the {needle} service process"),
                format!("{ERROR_TITLE}: {detail}"),
                ctx.tags().clone(),
            );
            let notified = self.send(&event).await;
            return RunReport {
                outcome: RunOutcome::AgentMissing,
                output: OutputBuffer::new(),
                notified,
                cleanup: None,
            };
        }

        let (outcome, output) = self.execute(ctx).await;
        let notified = self.send(&event_for(ctx, &outcome, &output)).await;
        let cleanup = self.cleanup(ctx.backup_dir()).await;

        info!(exit_code = outcome.exit_code(), notified, "backup run finished");
        RunReport {
            outcome,
            output,
            notified,
            cleanup: Some(cleanup),
        }
    }

    /// `Err` carries a human-readable reason for the notification body.
    async fn check_agent(&self, ctx: &RunContext) -> Result<(), String> {
        let needle = &ctx.config().backup.agent_process;
        let listing = bounded(
            "process listing",
            ctx.timeouts().process_check(),
            self.caps.lister.list(),
        )
        .await;

        match listing {
            Ok(listing) if agent_present(&listing, needle, std::process::id()) => {
                debug!(agent = %needle, "backup agent is running");
                Ok(())
            }
            Ok(_) => Err(format!("no process matching '{needle}' is running")),
            Err(e) => Err(format!("could not list processes: {e}")),
        }
    }

    async fn execute(&self, ctx: &RunContext) -> (RunOutcome, OutputBuffer) {
        let backup = &ctx.config().backup;
        if let Err(e) = self
            .caps
            .ownership
            .chown(
                ctx.backup_dir(),
                &backup.owner,
                &backup.group,
                backup.recursive_chown.is_enabled(),
            )
            .await
        {
            let err = StageError::new(Stage::Permissions, e);
            error!(error = %err, "cannot normalize backup directory ownership");
            return (RunOutcome::Aborted(err), OutputBuffer::new());
        }
        debug!(owner = %backup.owner, group = %backup.group, "backup directory ownership normalized");

        let (outcome, output) = self.run_backup(ctx).await;
        if let BackupOutcome::Failed(reason) = outcome {
            error!(%reason, lines = output.len(), "backup failed");
            return (RunOutcome::BackupFailed(reason), output);
        }
        info!(lines = output.len(), "backup completed");

        match self.store(ctx).await {
            Ok((latest, interval)) => (RunOutcome::Stored { latest, interval }, output),
            Err(err) => {
                error!(error = %err, "backup could not be stored");
                (RunOutcome::Aborted(err), output)
            }
        }
    }

    async fn run_backup(&self, ctx: &RunContext) -> (BackupOutcome, OutputBuffer) {
        let mut classifier = OutcomeClassifier::new(ctx.config().backup.completion_marker.as_str());
        let drained = bounded(
            "backup",
            ctx.timeouts().backup(),
            self.drain_backup(ctx, &mut classifier),
        )
        .await;

        let outcome = match drained {
            Ok(exit) => classifier.classify(exit),
            Err(ToolError::Timeout { after_ms, .. }) => {
                BackupOutcome::Failed(FailureReason::TimedOut { after_ms })
            }
            Err(e) => BackupOutcome::Failed(FailureReason::Tool(e.to_string())),
        };
        (outcome, classifier.into_buffer())
    }

    async fn drain_backup(
        &self,
        ctx: &RunContext,
        classifier: &mut OutcomeClassifier,
    ) -> ToolResult<ExitInfo> {
        let mut stream = self
            .caps
            .backup
            .start(ctx.cluster_file(), ctx.backup_dir())
            .await?;

        while let Some(line) = stream.next_line().await? {
            info!(target: "fdbbackup", "{line}");
            classifier.observe(&line);
        }
        let exit = stream.finish().await?;
        debug!(%exit, marker_seen = classifier.marker_seen(), "backup tool exited");
        Ok(exit)
    }

    /// Archive the directory and upload it to the latest and interval destinations.
    async fn store(&self, ctx: &RunContext) -> Result<(String, String), StageError> {
        let timeouts = ctx.timeouts();
        let archive = bounded(
            "archive",
            timeouts.archive(),
            self.caps.archiver.archive(ctx.backup_dir(), &ctx.archive_name()),
        )
        .await
        .map_err(|e| StageError::new(Stage::Archive, e))?;
        info!(archive = %archive.display(), "archive created");

        let storage = &ctx.config().storage;
        let latest = ctx.latest_url();
        let interval = ctx.interval_url();
        for url in [&latest, &interval] {
            retry_once("upload", storage.retry_delay(), || {
                bounded(
                    "upload",
                    timeouts.upload(),
                    self.caps.store.upload(&archive, url, &storage.region),
                )
            })
            .await
            .map_err(|e| StageError::new(Stage::Upload, e))?;
            info!(%url, "archive uploaded");
        }
        Ok((latest, interval))
    }

    /// Deliver one event. Failures are logged and reported as `false`, never propagated.
    async fn send(&self, event: &NotificationEvent) -> bool {
        match self.caps.notifier.notify(event).await {
            Ok(()) => {
                info!(title = %event.title, alert_type = %event.alert_type, "notification sent");
                true
            }
            Err(e) => {
                error!(title = %event.title, error = %e, "notification could not be delivered");
                false
            }
        }
    }

    async fn cleanup(&self, dir: &Path) -> CleanupReport {
        let owned = dir.to_path_buf();
        let report = tokio::task::spawn_blocking(move || clear_directory(&owned))
            .await
            .unwrap_or_else(|e| CleanupReport {
                removed: 0,
                failed: vec![(dir.display().to_string(), e.to_string())],
            });

        if report.is_clean() {
            info!(removed = report.removed, "backup directory cleaned");
        } else {
            warn!(
                removed = report.removed,
                failed = report.failed.len(),
                "backup directory only partially cleaned",
            );
        }
        report
    }
}

/// Build the notification for a finished run.
fn event_for(ctx: &RunContext, outcome: &RunOutcome, output: &OutputBuffer) -> NotificationEvent {
    let tags = ctx.tags().clone();
    match outcome {
        RunOutcome::Stored { latest, interval } => NotificationEvent::success(
            SUCCESS_TITLE,
            with_output(&format!("latest: {latest}\ninterval: {interval}"), output),
            tags,
        ),
        RunOutcome::BackupFailed(reason) => {
            NotificationEvent::error(ERROR_TITLE, with_output(&reason.to_string(), output), tags)
        }
        RunOutcome::Aborted(err) => {
            NotificationEvent::error(ERROR_TITLE, with_output(&err.to_string(), output), tags)
        }
        RunOutcome::AgentMissing => NotificationEvent::error(ERROR_TITLE, "backup agent not running", tags),
    }
}

fn with_output(summary: &str, output: &OutputBuffer) -> String {
    if output.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}\n\n{}", output.render())
    }
}

/// Await `fut`, failing with [`ToolError::Timeout`] once `limit` (if any) expires.
async fn bounded<T, F>(what: &str, limit: Option<Duration>, fut: F) -> ToolResult<T>
where
    F: Future<Output = ToolResult<T>>,
{
    let Some(limit) = limit else {
        return fut.await;
    };
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ToolError::Timeout {
            program: what.to_string(),
            after_ms: limit.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::atomic::Ordering};

    use fdbvault_model::{AlertType, Priority, TimestampLabel};
    use time::macros::datetime;

    use super::*;
    use crate::fakes::{Harness, job_config};

    const AGENT_LISTING: &str = "USER PID COMMAND\n\
        foundationdb 4194305 0.0 0.1 1 1 ? Ssl 10:00 0:01 /usr/lib/foundationdb/backup_agent/backup_agent\n";

    struct Run {
        _dir: tempfile::TempDir,
        ctx: RunContext,
    }

    fn run_in_tempdir(tweak: impl FnOnce(&mut fdbvault_model::JobConfig)) -> Run {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("snapshot.kv"), b"data").unwrap();
        fs::create_dir(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join("logs/log.0"), b"log").unwrap();

        let mut cfg = job_config(dir.path());
        tweak(&mut cfg);
        let label = TimestampLabel::from_datetime(datetime!(2016-01-21 09:05 UTC));
        Run {
            ctx: RunContext::new(Arc::new(cfg), label),
            _dir: dir,
        }
    }

    fn dir_is_empty(ctx: &RunContext) -> bool {
        ctx.backup_dir().is_dir() && fs::read_dir(ctx.backup_dir()).unwrap().count() == 0
    }

    #[tokio::test]
    async fn missing_agent_notifies_and_exits_one_without_backup() {
        let run = run_in_tempdir(|_| {});
        let h = Harness::new("USER PID COMMAND\nroot 1 /sbin/init\n", &[], ExitInfo::success());

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        assert_eq!(report.outcome, RunOutcome::AgentMissing);
        assert_eq!(report.exit_code(), EXIT_AGENT_MISSING);
        assert_eq!(h.backup.starts.load(Ordering::SeqCst), 0);
        assert!(h.ownership.calls.lock().unwrap().is_empty());
        assert!(report.cleanup.is_none());

        let events = h.notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Unable to find the backup_agent service process");
        assert_eq!(events[0].alert_type, AlertType::Error);
        assert_eq!(events[0].priority, Priority::Normal);
    }

    #[tokio::test]
    async fn listing_failure_counts_as_missing_agent() {
        let run = run_in_tempdir(|_| {});
        let h = Harness::new("", &[], ExitInfo::success());
        h.lister.fail_with(ToolError::Spawn {
            program: "ps".into(),
            reason: "No such file or directory".into(),
        });

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        assert_eq!(report.exit_code(), EXIT_AGENT_MISSING);
        assert!(h.notifier.events()[0].body.contains("could not list processes"));
    }

    #[tokio::test(start_paused = true)]
    async fn successful_backup_is_archived_uploaded_twice_and_reported_once() {
        let run = run_in_tempdir(|_| {});
        let h = Harness::new(
            AGENT_LISTING,
            &["Submitted backup", "The backup on tag `default' is complete."],
            ExitInfo::success(),
        );

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        let latest = "s3://YER_s3_Bucket/latest/foundationdb-latest.tar".to_string();
        let interval = "s3://YER_s3_Bucket/intervals/01-21-2016-09-05.tar".to_string();
        assert_eq!(
            report.outcome,
            RunOutcome::Stored {
                latest: latest.clone(),
                interval: interval.clone()
            }
        );
        assert_eq!(report.exit_code(), EXIT_OK);

        let archives = h.archiver.calls.lock().unwrap().clone();
        assert_eq!(archives.len(), 1);
        assert_eq!(archives[0].1, "01-21-2016-09-05.tar");
        assert_eq!(h.store.uploaded(), vec![latest, interval]);

        let events = h.notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].alert_type, AlertType::Success);
        assert_eq!(events[0].title, "FDB Backup Success");
        assert!(events[0].body.contains("is complete."));

        let (dir, owner, group, recursive) = h.ownership.calls.lock().unwrap()[0].clone();
        assert_eq!(dir, run.ctx.backup_dir());
        assert_eq!((owner.as_str(), group.as_str(), recursive), ("foundationdb", "foundationdb", true));

        assert!(report.cleanup.unwrap().is_clean());
        assert!(dir_is_empty(&run.ctx));
    }

    #[tokio::test]
    async fn output_without_marker_is_a_failure_with_full_output() {
        let run = run_in_tempdir(|_| {});
        let lines = ["Submitted backup", "ERROR: backup aborted", "Fatal error"];
        let h = Harness::new(AGENT_LISTING, &lines, ExitInfo::success());

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        assert!(matches!(
            report.outcome,
            RunOutcome::BackupFailed(FailureReason::MarkerMissing { .. })
        ));
        assert_eq!(report.exit_code(), EXIT_OK);
        assert!(h.archiver.calls.lock().unwrap().is_empty());
        assert!(h.store.uploaded().is_empty());

        let events = h.notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].alert_type, AlertType::Error);
        assert!(events[0].body.ends_with(&lines.join("\n")));
        assert!(dir_is_empty(&run.ctx));
    }

    #[tokio::test]
    async fn non_zero_exit_fails_even_with_marker() {
        let run = run_in_tempdir(|_| {});
        let h = Harness::new(AGENT_LISTING, &["backup complete"], ExitInfo::code(1));

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        assert_eq!(
            report.outcome,
            RunOutcome::BackupFailed(FailureReason::Exit(ExitInfo::code(1)))
        );
        assert!(h.store.uploaded().is_empty());
        assert_eq!(h.notifier.events().len(), 1);
        assert!(h.notifier.events()[0].body.contains("backup complete"));
    }

    #[tokio::test]
    async fn ownership_failure_aborts_but_still_notifies_and_cleans() {
        let run = run_in_tempdir(|_| {});
        let h = Harness::new(AGENT_LISTING, &["complete"], ExitInfo::success());
        h.ownership.fail_with(ToolError::Account("unknown user 'foundationdb'".into()));

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        assert!(matches!(
            &report.outcome,
            RunOutcome::Aborted(StageError { stage: Stage::Permissions, .. })
        ));
        assert_eq!(report.exit_code(), EXIT_STAGE_FAILED);
        assert_eq!(h.backup.starts.load(Ordering::SeqCst), 0);
        assert_eq!(h.notifier.events().len(), 1);
        assert!(h.notifier.events()[0].body.contains("permissions stage failed"));
        assert!(dir_is_empty(&run.ctx));
    }

    #[tokio::test(start_paused = true)]
    async fn upload_is_retried_once() {
        let run = run_in_tempdir(|_| {});
        let h = Harness::new(AGENT_LISTING, &["complete"], ExitInfo::success());
        h.store.fail_next(1);

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        assert!(matches!(report.outcome, RunOutcome::Stored { .. }));
        assert_eq!(h.store.attempts.load(Ordering::SeqCst), 3);
        assert_eq!(h.store.uploaded().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn upload_failing_twice_is_fatal() {
        let run = run_in_tempdir(|_| {});
        let h = Harness::new(AGENT_LISTING, &["complete"], ExitInfo::success());
        h.store.fail_next(2);

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        assert!(matches!(
            &report.outcome,
            RunOutcome::Aborted(StageError { stage: Stage::Upload, .. })
        ));
        assert_eq!(report.exit_code(), EXIT_STAGE_FAILED);
        let events = h.notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].alert_type, AlertType::Error);
        assert!(dir_is_empty(&run.ctx));
    }

    #[tokio::test]
    async fn archive_failure_skips_uploads() {
        let run = run_in_tempdir(|_| {});
        let h = Harness::new(AGENT_LISTING, &["complete"], ExitInfo::success());
        h.archiver.fail_with(ToolError::Failed {
            program: "tar".into(),
            status: "exit code 2".into(),
            detail: "No space left on device".into(),
        });

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        assert!(matches!(
            &report.outcome,
            RunOutcome::Aborted(StageError { stage: Stage::Archive, .. })
        ));
        assert!(h.store.uploaded().is_empty());
    }

    #[tokio::test]
    async fn notification_failure_does_not_change_exit_code() {
        let run = run_in_tempdir(|_| {});
        let h = Harness::new(AGENT_LISTING, &["nope"], ExitInfo::success());
        h.notifier.fail();

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        assert!(!report.notified);
        assert_eq!(report.exit_code(), EXIT_OK);
        assert!(dir_is_empty(&run.ctx));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_backup_times_out() {
        let run = run_in_tempdir(|cfg| cfg.timeouts.backup_ms = Some(50));
        let h = Harness::new(AGENT_LISTING, &["Submitted backup"], ExitInfo::success());
        h.backup.hang_after_lines();

        let report = BackupPipeline::new(h.caps()).run(&run.ctx).await;

        assert_eq!(
            report.outcome,
            RunOutcome::BackupFailed(FailureReason::TimedOut { after_ms: 50 })
        );
        assert_eq!(report.output.lines(), ["Submitted backup"]);
        assert!(h.notifier.events()[0].body.contains("Submitted backup"));
    }
}
