//! Classification of a backup run from its streamed output and final exit status.
use std::fmt;

use crate::ports::ExitInfo;

/// Ordered lines captured from the backup tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer(Vec<String>);

impl OutputBuffer {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All lines joined with `\n`.
    pub fn render(&self) -> String {
        self.0.join("\n")
    }
}

/// Why a backup is considered failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The tool exited zero but never printed the completion marker.
    MarkerMissing { marker: String },
    /// The tool exited non-zero or was killed by a signal.
    Exit(ExitInfo),
    /// The stage timeout expired before the tool finished.
    TimedOut { after_ms: u64 },
    /// The tool could not be run or its output could not be read.
    Tool(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::MarkerMissing { marker } => {
                write!(f, "completion marker '{marker}' never seen in output")
            }
            FailureReason::Exit(exit) => write!(f, "backup tool {exit}"),
            FailureReason::TimedOut { after_ms } => {
                write!(f, "backup did not finish within {after_ms} ms")
            }
            FailureReason::Tool(reason) => f.write_str(reason),
        }
    }
}

/// Result of classifying one backup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Succeeded,
    Failed(FailureReason),
}

impl BackupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BackupOutcome::Succeeded)
    }
}

/// Watches backup output for the completion marker and buffers every line.
///
/// The exit status is only looked at once, after the output is drained: a run succeeds iff the
/// marker was seen *and* the tool exited zero.
#[derive(Debug, Clone)]
pub struct OutcomeClassifier {
    marker: String,
    marker_seen: bool,
    buffer: OutputBuffer,
}

impl OutcomeClassifier {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            marker_seen: false,
            buffer: OutputBuffer::new(),
        }
    }

    /// Record one output line. Trailing `\r`/`\n` are dropped before matching and buffering.
    pub fn observe(&mut self, line: &str) {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.contains(self.marker.as_str()) {
            self.marker_seen = true;
        }
        self.buffer.push(line);
    }

    pub fn marker_seen(&self) -> bool {
        self.marker_seen
    }

    /// Classify using the final exit status of the tool.
    pub fn classify(&self, exit: ExitInfo) -> BackupOutcome {
        if !exit.is_success() {
            return BackupOutcome::Failed(FailureReason::Exit(exit));
        }
        if !self.marker_seen {
            return BackupOutcome::Failed(FailureReason::MarkerMissing {
                marker: self.marker.clone(),
            });
        }
        BackupOutcome::Succeeded
    }

    /// Hand over the captured output.
    pub fn into_buffer(self) -> OutputBuffer {
        self.buffer
    }
}
