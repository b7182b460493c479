//! Blocking execution of external helper commands.
//!
//! Jobs never call `std::process::Command` directly; they go through a
//! `CommandRunner` so the probes can be exercised without real block devices.
//! `SystemCommandRunner` is the production implementation: it isolates the
//! child in its own process group and registers the PID for cleanup.

use crate::error::{Result, SetupError};
use crate::process_guard::{ChildRegistry, CommandProcessGroup};
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Normal termination with exit status zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Trimmed stdout if the command succeeded and printed something.
    pub fn trimmed_stdout(&self) -> Option<String> {
        if !self.success() {
            return None;
        }
        let out = self.stdout.trim();
        (!out.is_empty()).then(|| out.to_string())
    }
}

/// Runs a program to completion and captures its output.
///
/// `Err` means the program could not be started or waited on; a non-zero exit is
/// reported through `CommandOutput::exit_code`.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(program, args)
    }
}

/// Spawns real processes. Blocks until the child exits; there is no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!(program, ?args, "running helper command");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .in_new_process_group()
            .spawn()
            .map_err(|e| SetupError::command(format!("failed to spawn {}: {}", program, e)))?;
        let pid = child.id();

        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.register(pid);
        }
        let waited = child.wait_with_output();
        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.unregister(pid);
        }

        let output = waited
            .map_err(|e| SetupError::command(format!("failed waiting for {}: {}", program, e)))?;
        let result = CommandOutput {
            // Helpers print in the locale encoding; lossy UTF-8 is close enough for UUIDs.
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };
        debug!(program, exit_code = ?result.exit_code, "helper command finished");
        Ok(result)
    }
}
