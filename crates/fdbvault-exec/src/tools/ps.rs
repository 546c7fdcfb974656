use async_trait::async_trait;
use fdbvault_core::{ProcessLister, ToolResult};

use crate::subprocess::{CommandSpec, run_captured};

/// Lists processes with `ps aux`.
#[derive(Debug, Clone)]
pub struct PsProcessLister {
    command: CommandSpec,
}

impl PsProcessLister {
    pub fn new() -> Self {
        Self::with_command(CommandSpec::new("ps").arg("aux"))
    }

    /// Use a different listing command; its stdout must follow the `ps aux` layout.
    pub fn with_command(command: CommandSpec) -> Self {
        Self { command }
    }
}

impl Default for PsProcessLister {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessLister for PsProcessLister {
    async fn list(&self) -> ToolResult<String> {
        let out = run_captured(&self.command)
            .await?
            .check(self.command.program())?;
        Ok(out.stdout)
    }
}

#[cfg(test)]
mod tests {
    use fdbvault_core::{ToolError, agent_present};

    use super::*;

    #[tokio::test]
    async fn listing_is_stdout() {
        let lister = PsProcessLister::with_command(CommandSpec::new("sh").arg("-c").arg(
            "echo 'USER PID COMMAND'; echo 'fdb 4194305 /usr/lib/foundationdb/backup_agent/backup_agent'",
        ));
        let listing = lister.list().await.unwrap();
        assert!(agent_present(&listing, "backup_agent", std::process::id()));
    }

    #[tokio::test]
    async fn failing_listing_is_an_error() {
        let lister = PsProcessLister::with_command(CommandSpec::new("sh").arg("-c").arg("exit 1"));
        assert!(matches!(lister.list().await, Err(ToolError::Failed { .. })));
    }
}
