use std::sync::Arc;

use anyhow::Context;
use fdbvault_core::{BackupPipeline, Capabilities, RunContext, RunOutcome};
use fdbvault_exec::{AwsS3Store, ChownOwnershipFixer, FdbBackupTool, PsProcessLister, TarArchiver};
use fdbvault_model::{JobConfig, TimestampLabel};
use fdbvault_notify::DatadogNotifier;
use fdbvault_observe::{format_offset, init_local_offset, init_logger, local_offset};
use tracing::{error, info, warn};

use crate::settings::Settings;

/// Startup failed before any backup work (configuration, logger, runtime).
pub const EXIT_CONFIG: i32 = 78;

/// Initialize logging, build the runtime and execute one backup run.
///
/// Returns the process exit code of the run.
pub fn run(settings: Settings) -> anyhow::Result<i32> {
    // Must happen while the process is still single-threaded.
    init_local_offset();
    init_logger(&settings.logger).context("cannot initialize logging")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot build async runtime")?;
    runtime.block_on(execute(settings.job))
}

async fn execute(job: JobConfig) -> anyhow::Result<i32> {
    let offset = local_offset();
    let label = TimestampLabel::now(offset);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        utc_offset = %format_offset(offset),
        %label,
        bucket = %job.storage.bucket_url(),
        region = %job.storage.region,
        "fdbvault starting",
    );

    let caps = capabilities(&job)?;
    let ctx = RunContext::new(Arc::new(job), label);
    let report = BackupPipeline::new(caps).run(&ctx).await;

    match &report.outcome {
        RunOutcome::Stored { latest, interval } => {
            info!(%latest, %interval, "backup stored")
        }
        RunOutcome::BackupFailed(reason) => warn!(%reason, "backup failed"),
        RunOutcome::AgentMissing => error!("backup agent missing"),
        RunOutcome::Aborted(err) => error!(error = %err, "backup run aborted"),
    }
    Ok(report.exit_code())
}

fn capabilities(job: &JobConfig) -> anyhow::Result<Capabilities> {
    let notifier = DatadogNotifier::new(&job.datadog).context("cannot create Datadog client")?;
    Ok(Capabilities {
        lister: Arc::new(PsProcessLister::new()),
        ownership: Arc::new(ChownOwnershipFixer),
        backup: Arc::new(FdbBackupTool::from_config(&job.backup)),
        archiver: Arc::new(TarArchiver::new()),
        store: Arc::new(AwsS3Store::from_config(&job.storage)),
        notifier: Arc::new(notifier),
    })
}
