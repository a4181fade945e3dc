//! Command execution abstraction for testability.
//!
//! `systemctl` calls go through [`CommandExecutor`] so that unit tests can
//! mock them instead of touching the host's init system.

use std::process::{Command, Stdio};

use crate::error::{HostsError, Result};

#[cfg(test)]
use mockall::automock;

/// Output from command execution
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// The exit code, if available
    pub code: Option<i32>,
}

/// Runs external programs.
///
/// An `Err` means the program could not be started at all; a program that
/// ran and failed is reported through [`CommandOutput::success`].
#[cfg_attr(test, automock)]
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, cmd: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Executor backed by `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct RealCommandExecutor;

impl RealCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, cmd: &str, args: &[String]) -> Result<CommandOutput> {
        let output = Command::new(cmd)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| HostsError::Command(format!("Failed to run {}: {}", cmd, e)))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Run a command and turn a non-zero exit into [`HostsError::Command`].
pub fn run_checked(executor: &dyn CommandExecutor, cmd: &str, args: &[&str]) -> Result<CommandOutput> {
    let output = executor.execute(cmd, &args_to_strings(args))?;
    if !output.success {
        return Err(HostsError::Command(format!(
            "{} {} exited with {}: {}",
            cmd,
            args.join(" "),
            output
                .code
                .map_or_else(|| "signal".to_string(), |c| c.to_string()),
            output.stderr.trim()
        )));
    }
    Ok(output)
}

/// Convert a slice of &str to Vec<String>.
///
/// mockall has issues with lifetimes in `&[&str]`, so the trait takes
/// `&[String]` instead.
pub fn args_to_strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
