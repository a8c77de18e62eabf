//! Process-execution boundary.
//!
//! Every external command (test listing, test runs) goes through [`CommandRunner`]. The default
//! implementation hands the command line to `sh -c` inside the project directory; tests substitute
//! scripted runners.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::TestError;

/// Captured result of one finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Human-readable exit status for logs and errors.
    pub fn status_label(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

/// Run a shell command line and capture its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` with `working_dir` as its current directory and wait for it to finish.
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`], not as an error; only a
    /// failure to launch the process is an `Err`.
    async fn run(&self, command: &str, working_dir: &Path) -> Result<CommandOutput, TestError>;
}

/// `sh -c` execution with output capture.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellCommandRunner;

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &str, working_dir: &Path) -> Result<CommandOutput, TestError> {
        tracing::debug!(command, working_dir = %working_dir.display(), "spawning command");

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| TestError::Spawn {
                command: command.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shell_runner_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let output = ShellCommandRunner.run("echo hello", dir.path()).await.unwrap();
        assert!(output.success);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn shell_runner_reports_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let output = ShellCommandRunner.run("echo oops >&2; exit 3", dir.path()).await.unwrap();
        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stderr.trim(), "oops");
        assert_eq!(output.status_label(), "exit code 3");
    }

    #[tokio::test]
    async fn shell_runner_uses_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        ShellCommandRunner.run("touch marker", dir.path()).await.unwrap();
        assert!(dir.path().join("marker").exists());
    }
}
