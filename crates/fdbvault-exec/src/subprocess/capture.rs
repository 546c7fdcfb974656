use std::process::Stdio;

use fdbvault_core::{ExitInfo, ToolError, ToolResult};
use tracing::{debug, trace};

use super::{CommandSpec, logger::truncate_line};
use crate::ExecError;

const DETAIL_MAX: usize = 4096;

/// Output of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub exit: ExitInfo,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Turn a non-zero exit into [`ToolError::Failed`], keeping stderr (or stdout) as detail.
    pub fn check(self, program: &str) -> ToolResult<Self> {
        if self.exit.is_success() {
            return Ok(self);
        }
        let detail = match self.stderr.trim() {
            "" => self.stdout.trim(),
            stderr => stderr,
        };
        Err(ToolError::Failed {
            program: program.to_string(),
            status: self.exit.to_string(),
            detail: truncate_line(detail, DETAIL_MAX).into_owned(),
        })
    }
}

/// Run `spec` to completion, collecting stdout and stderr.
///
/// Dropping the returned future kills the child.
pub async fn run_captured(spec: &CommandSpec) -> ToolResult<Captured> {
    spec.validate()?;
    let mut cmd = spec.to_command();
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    trace!(command = %spec, "spawning");
    let child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: spec.program().to_string(),
        source,
    })?;
    let output = child.wait_with_output().await?;

    let captured = Captured {
        exit: output.status.into(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    debug!(command = %spec, exit = %captured.exit, "command finished");
    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn collects_both_streams() {
        let out = run_captured(&sh("echo out; echo err >&2")).await.unwrap();
        assert!(out.exit.is_success());
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
    }

    #[tokio::test]
    async fn non_zero_exit_becomes_failed_with_stderr_detail() {
        let out = run_captured(&sh("echo nope >&2; exit 3")).await.unwrap();
        let err = out.check("tar").unwrap_err();
        assert_eq!(
            err,
            ToolError::Failed {
                program: "tar".into(),
                status: "exit code 3".into(),
                detail: "nope".into(),
            }
        );
    }

    #[tokio::test]
    async fn env_is_passed_through() {
        let mut env = fdbvault_model::Env::new();
        env.push("FDBVAULT_TEST_VALUE", "42");
        let out = run_captured(&sh("echo $FDBVAULT_TEST_VALUE").envs(&env)).await.unwrap();
        assert_eq!(out.stdout.trim(), "42");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = run_captured(&CommandSpec::new("/nonexistent/fdbvault-tool")).await.unwrap_err();
        assert!(matches!(err, ToolError::Spawn { program, .. } if program == "/nonexistent/fdbvault-tool"));
    }
}
