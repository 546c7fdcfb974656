pub mod classify;
pub mod cleanup;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod ports;
mod retry;

#[cfg(test)]
mod fakes;

pub use classify::{BackupOutcome, FailureReason, OutcomeClassifier, OutputBuffer};
pub use cleanup::{CleanupReport, clear_directory};
pub use context::RunContext;
pub use error::{Stage, StageError, ToolError, ToolResult};
pub use pipeline::{BackupPipeline, Capabilities, RunOutcome, RunReport};
pub use pipeline::{EXIT_AGENT_MISSING, EXIT_OK, EXIT_STAGE_FAILED};
pub use ports::{
    Archiver, BackupStream, BackupTool, ExitInfo, Notifier, ObjectStore, OwnershipFixer,
    ProcessLister, agent_present,
};

pub mod prelude {
    pub use crate::context::RunContext;
    pub use crate::error::{ToolError, ToolResult};
    pub use crate::pipeline::{BackupPipeline, Capabilities, RunOutcome, RunReport};
    pub use crate::ports::{
        Archiver, BackupStream, BackupTool, ExitInfo, Notifier, ObjectStore, OwnershipFixer,
        ProcessLister,
    };
}
