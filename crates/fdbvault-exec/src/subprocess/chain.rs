use std::{collections::VecDeque, process::Stdio};

use async_trait::async_trait;
use fdbvault_core::{BackupStream, ExitInfo, ToolError, ToolResult};
use tokio::{
    process::{Child, ChildStdout},
    task::JoinHandle,
};
use tracing::{debug, trace, warn};

use super::{
    CommandSpec, LogConfig,
    lines::LineReader,
    logger::forward_stderr,
};
use crate::ExecError;

/// Commands run one after another with shell `&&` semantics, exposed as one line stream.
///
/// Stdout of every command that runs is yielded in order. Stderr is forwarded to the log.
/// A command that exits non-zero stops the chain; the final exit status is that of the last
/// command that actually ran.
pub struct ChainedStream {
    pending: VecDeque<CommandSpec>,
    current: Option<Running>,
    last_exit: Option<ExitInfo>,
    log: LogConfig,
}

struct Running {
    program: String,
    child: Child,
    stdout: LineReader<ChildStdout>,
    stderr: Option<JoinHandle<()>>,
}

impl ChainedStream {
    /// Validate every command up front; nothing is spawned until the first read.
    pub fn new(commands: impl IntoIterator<Item = CommandSpec>, log: LogConfig) -> ToolResult<Self> {
        let pending: VecDeque<CommandSpec> = commands.into_iter().collect();
        if pending.is_empty() {
            return Err(ExecError::InvalidCommand("empty command chain".into()).into());
        }
        for spec in &pending {
            spec.validate()?;
        }
        Ok(Self {
            pending,
            current: None,
            last_exit: None,
            log,
        })
    }

    fn spawn(&self, spec: &CommandSpec) -> ToolResult<Running> {
        let mut cmd = spec.to_command();
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        debug!(command = %spec, "starting command");
        let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
            program: spec.program().to_string(),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ToolError::Io(format!("'{}' has no stdout pipe", spec.program())))?;
        let stderr = child
            .stderr
            .take()
            .map(|stderr| forward_stderr(spec.program().to_string(), stderr, self.log));

        Ok(Running {
            program: spec.program().to_string(),
            child,
            stdout: LineReader::new(stdout),
            stderr,
        })
    }

    /// Wait for a command whose stdout reached EOF.
    async fn reap(&mut self, mut running: Running) -> ToolResult<()> {
        let status = running.child.wait().await?;
        if let Some(handle) = running.stderr.take() {
            let _ = handle.await;
        }

        let exit = ExitInfo::from(status);
        self.last_exit = Some(exit);
        if exit.is_success() {
            trace!(program = %running.program, "command exited zero");
        } else {
            warn!(
                program = %running.program,
                %exit,
                skipped = self.pending.len(),
                "command failed; skipping the rest of the chain",
            );
            self.pending.clear();
        }
        Ok(())
    }
}

#[async_trait]
impl BackupStream for ChainedStream {
    async fn next_line(&mut self) -> ToolResult<Option<String>> {
        loop {
            if self.current.is_none() {
                let Some(spec) = self.pending.pop_front() else {
                    return Ok(None);
                };
                self.current = Some(self.spawn(&spec)?);
            }
            let Some(running) = self.current.as_mut() else {
                continue;
            };
            if let Some(line) = running.stdout.next_line().await? {
                return Ok(Some(line));
            }
            if let Some(done) = self.current.take() {
                self.reap(done).await?;
            }
        }
    }

    async fn finish(&mut self) -> ToolResult<ExitInfo> {
        while self.next_line().await?.is_some() {}
        self.last_exit
            .ok_or_else(|| ToolError::Io("command chain produced no exit status".into()))
    }
}
