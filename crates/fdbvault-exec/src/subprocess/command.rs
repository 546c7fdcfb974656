use std::{fmt, process::Stdio};

use fdbvault_model::Env;
use tokio::process::Command;
use tracing::trace;

use crate::ExecError;

/// One external command: program, arguments and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    /// Added on top of the inherited environment; later entries win.
    env: Env,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Env::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs(mut self, env: &Env) -> Self {
        for kv in env.iter() {
            self.env.push(kv.key(), kv.value());
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Validate the command before spawning.
    ///
    /// Rules:
    /// - `program` is not empty or whitespace-only.
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.program.trim().is_empty() {
            return Err(ExecError::InvalidCommand("program is empty".into()));
        }
        Ok(())
    }

    /// Build a `tokio` command with stdin closed. The child is killed if its handle is dropped.
    pub(crate) fn to_command(&self) -> Command {
        trace!(
            command = %self,
            env_len = self.env.len(),
            "building command",
        );
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for kv in self.env.iter() {
            cmd.env(kv.key(), kv.value());
        }
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
