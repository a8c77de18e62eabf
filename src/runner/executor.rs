//! Resilient execution of one Jest command.
//!
//! Jest may exit non-zero and still have flushed a complete (or partial) JSON report, e.g. when
//! tests fail or a worker crashes. The report file, not the exit status, decides whether an
//! attempt produced something usable:
//!
//! | exit status | report file | verdict       |
//! |-------------|-------------|---------------|
//! | success     | present     | done          |
//! | failure     | present     | soft success  |
//! | success     | missing     | retry         |
//! | failure     | missing     | retry         |
//!
//! Every attempt, the last one included, checks for the report before deciding, so a report written
//! by the final attempt is still parsed. A report missing after the last attempt is a fatal error
//! carrying that attempt's cause.

use std::path::Path;
use std::time::Duration;

use jestx_core::RunRecords;

use super::parser::parse_output_file;
use super::{CommandOutput, CommandRunner, TestError};

/// Attempts per command, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Fixed delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPresence {
    Present,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptVerdict {
    Done,
    SoftSuccess,
    Retry,
}

/// The decision table above.
pub fn decide(exit: ExitStatus, output: OutputPresence) -> AttemptVerdict {
    match (exit, output) {
        (ExitStatus::Succeeded, OutputPresence::Present) => AttemptVerdict::Done,
        (ExitStatus::Failed, OutputPresence::Present) => AttemptVerdict::SoftSuccess,
        (_, OutputPresence::Missing) => AttemptVerdict::Retry,
    }
}

async fn presence(path: &Path) -> OutputPresence {
    match tokio::fs::try_exists(path).await {
        Ok(true) => OutputPresence::Present,
        _ => OutputPresence::Missing,
    }
}

/// Runs a command until it yields a report file, then parses it.
pub struct ResilientExecutor<'a> {
    runner: &'a dyn CommandRunner,
    config: ExecutorConfig,
}

impl<'a> ResilientExecutor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: ExecutorConfig) -> Self {
        Self { runner, config }
    }

    /// Run `command` in `project_path` and parse the report it writes to `output_file`.
    ///
    /// ## Parameters
    /// - `output_file`: report path, resolved against `project_path` when relative.
    ///
    /// ## Notes
    /// - A report left over from an earlier invocation is removed before the first attempt so it
    ///   cannot be mistaken for this run's output.
    /// - Launch failures count as failed attempts and are retried like non-zero exits.
    ///
    /// ## Errors
    /// - [`TestError::Execution`] when no report exists after the last attempt.
    /// - [`TestError::ParseOutput`] when the report cannot be parsed.
    #[tracing::instrument(skip_all, fields(command = %command))]
    pub async fn execute(&self, project_path: &Path, command: &str, output_file: &str) -> Result<RunRecords, TestError> {
        let output_path = project_path.join(output_file);
        clear_stale_output(&output_path).await?;

        let max_attempts = self.config.max_attempts.max(1);
        let mut last_cause: Option<TestError> = None;

        for attempt in 1..=max_attempts {
            tracing::info!(attempt, max_attempts, "running jest");

            let (exit, cause) = match self.runner.run(command, project_path).await {
                Ok(output) => {
                    log_output(&output);
                    if output.success {
                        (ExitStatus::Succeeded, TestError::OutputMissing(output_path.clone()))
                    } else {
                        let cause = TestError::CommandFailed {
                            status: output.status_label(),
                            stderr: output.stderr.trim().to_string(),
                        };
                        (ExitStatus::Failed, cause)
                    }
                }
                Err(err) => (ExitStatus::Failed, err),
            };

            match decide(exit, presence(&output_path).await) {
                AttemptVerdict::Done => {
                    return parse_output_file(project_path, &output_path);
                }
                AttemptVerdict::SoftSuccess => {
                    tracing::warn!(attempt, error = %cause, "jest failed but wrote its report, using it");
                    return parse_output_file(project_path, &output_path);
                }
                AttemptVerdict::Retry => {
                    tracing::warn!(attempt, error = %cause, "jest produced no report");
                    last_cause = Some(cause);
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        Err(TestError::Execution {
            command: command.to_string(),
            attempts: max_attempts,
            source: Box::new(last_cause.unwrap_or_else(|| TestError::OutputMissing(output_path.clone()))),
        })
    }
}

async fn clear_stale_output(path: &Path) -> Result<(), TestError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed stale report");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(TestError::Io(err)),
    }
}

fn log_output(output: &CommandOutput) {
    tracing::debug!(
        status = %output.status_label(),
        stdout = %output.stdout,
        stderr = %output.stderr,
        "jest finished"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    const REPORT: &str = r#"{"testResults":[{"name":"/p/a.test.js","startTime":1,"endTime":2,"message":"",
        "assertionResults":[{"fullName":"works","status":"passed","failureMessages":[]}]}]}"#;

    /// Replays one scripted step per call: `(exit code, write the report?)`.
    struct ScriptedRunner {
        steps: Mutex<Vec<(i32, bool)>>,
        calls: Mutex<u32>,
        output_file: String,
    }

    impl ScriptedRunner {
        fn new(output_file: &str, steps: Vec<(i32, bool)>) -> Self {
            Self {
                steps: Mutex::new(steps.into_iter().rev().collect()),
                calls: Mutex::new(0),
                output_file: output_file.to_string(),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(&self, _command: &str, working_dir: &Path) -> Result<CommandOutput, TestError> {
            *self.calls.lock().unwrap() += 1;
            let (code, write) = self.steps.lock().unwrap().pop().unwrap_or((1, false));
            if write {
                std::fs::write(working_dir.join(&self.output_file), REPORT).unwrap();
            }
            Ok(CommandOutput {
                success: code == 0,
                code: Some(code),
                stdout: String::new(),
                stderr: if code == 0 { String::new() } else { "boom".to_string() },
            })
        }
    }

    fn fast() -> ExecutorConfig {
        ExecutorConfig {
            max_attempts: 3,
            retry_delay: Duration::ZERO,
        }
    }

    #[test]
    fn decision_table() {
        assert_eq!(decide(ExitStatus::Succeeded, OutputPresence::Present), AttemptVerdict::Done);
        assert_eq!(decide(ExitStatus::Failed, OutputPresence::Present), AttemptVerdict::SoftSuccess);
        assert_eq!(decide(ExitStatus::Succeeded, OutputPresence::Missing), AttemptVerdict::Retry);
        assert_eq!(decide(ExitStatus::Failed, OutputPresence::Missing), AttemptVerdict::Retry);
    }

    #[tokio::test]
    async fn soft_success_stops_after_first_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new("out.json", vec![(1, true), (1, true), (1, true)]);

        let records = ResilientExecutor::new(&runner, fast())
            .execute(dir.path(), "jest", "out.json")
            .await
            .unwrap();

        assert_eq!(runner.calls(), 1);
        assert!(records.contains_key("/p/a.test.js?works"));
    }

    #[tokio::test]
    async fn success_without_report_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new("out.json", vec![(0, false), (0, true)]);

        let records = ResilientExecutor::new(&runner, fast())
            .execute(dir.path(), "jest", "out.json")
            .await
            .unwrap();

        assert_eq!(runner.calls(), 2);
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn missing_report_after_budget_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new("out.json", vec![(1, false), (1, false), (1, false)]);

        let err = ResilientExecutor::new(&runner, fast())
            .execute(dir.path(), "jest", "out.json")
            .await
            .unwrap_err();

        assert_eq!(runner.calls(), 3);
        match err {
            TestError::Execution { attempts, source, .. } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, TestError::CommandFailed { ref stderr, .. } if stderr == "boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn report_from_last_failed_attempt_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new("out.json", vec![(1, false), (1, false), (1, true)]);

        let records = ResilientExecutor::new(&runner, fast())
            .execute(dir.path(), "jest", "out.json")
            .await
            .unwrap();

        assert_eq!(runner.calls(), 3);
        assert!(records.contains_key("/p/a.test.js?works"));
    }

    #[tokio::test]
    async fn stale_report_is_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("out.json"), REPORT).unwrap();
        let runner = ScriptedRunner::new("out.json", vec![(1, false), (1, false), (1, false)]);

        let result = ResilientExecutor::new(&runner, fast())
            .execute(dir.path(), "jest", "out.json")
            .await;

        assert!(matches!(result, Err(TestError::Execution { .. })));
        assert_eq!(runner.calls(), 3);
    }

    #[tokio::test]
    async fn malformed_report_is_a_parse_error() {
        struct Garbage;

        #[async_trait]
        impl CommandRunner for Garbage {
            async fn run(&self, _command: &str, working_dir: &Path) -> Result<CommandOutput, TestError> {
                std::fs::write(working_dir.join("out.json"), "{ not json").unwrap();
                Ok(CommandOutput {
                    success: true,
                    code: Some(0),
                    stdout: String::new(),
                    stderr: String::new(),
                })
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let err = ResilientExecutor::new(&Garbage, fast())
            .execute(dir.path(), "jest", "out.json")
            .await
            .unwrap_err();
        assert!(matches!(err, TestError::ParseOutput { .. }));
    }
}
