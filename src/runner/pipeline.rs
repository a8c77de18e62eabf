//! Orchestration of the load and run entry points.
//!
//! Groups are executed strictly one after another: each reuses a file-derived report name inside
//! the shared project directory. Results are reported as soon as a group finishes, so a later
//! group's failure never withholds an earlier group's results.

use std::path::{Path, PathBuf};
use std::time::Duration;

use jestx_core::{EntryParam, LoadError, LoadResult, TestCase};

use super::command::{CommandBuilder, output_file_name};
use super::coverage::relocate_coverage;
use super::discovery::{file_selectors, list_test_files, scan_test_cases};
use super::executor::{ExecutorConfig, ResilientExecutor};
use super::filter::{filter_test_cases, selects_all};
use super::grouping::group_by_file;
use super::normalize::normalize_records;
use super::{CommandRunner, Reporter, TestError};
use crate::config::{Config, RunMode};

/// Name recorded on the load error produced by a failed discovery.
pub const LOAD_ERROR_NAME: &str = "load";
/// Pause before relocating coverage, giving Jest time to flush its coverage report.
pub const DEFAULT_COVERAGE_FLUSH_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub executor: ExecutorConfig,
    pub coverage_flush_delay: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            executor: ExecutorConfig::default(),
            coverage_flush_delay: DEFAULT_COVERAGE_FLUSH_DELAY,
        }
    }
}

/// A file group that produced no reported results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFailure {
    pub file: String,
    pub error: String,
}

/// Outcome of a run invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub groups: usize,
    pub reported: usize,
    pub failures: Vec<GroupFailure>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Turn listed test files into selectors and narrow them by `selectors`.
pub fn discover_test_cases(
    config: &Config,
    project_path: &Path,
    files: &[PathBuf],
    selectors: &[String],
) -> Result<Vec<String>, TestError> {
    let candidates = match config.run_mode {
        RunMode::File => file_selectors(project_path, files),
        RunMode::Case => scan_test_cases(project_path, files)?,
    };
    tracing::info!(mode = ?config.run_mode, candidates = candidates.len(), "discovered test cases");

    if selects_all(selectors) {
        return Ok(candidates);
    }
    let filtered = filter_test_cases(project_path, selectors, &candidates, false);
    tracing::info!(selected = filtered.len(), "filtered test cases");
    Ok(filtered)
}

/// List the project's test files through Jest, then discover and filter their cases.
pub async fn collect_test_cases(
    runner: &dyn CommandRunner,
    config: &Config,
    project_path: &Path,
    selectors: &[String],
) -> Result<Vec<String>, TestError> {
    let files = list_test_files(runner, project_path).await?;
    discover_test_cases(config, project_path, &files, selectors)
}

/// Discovery entry point: collect test cases and report them.
///
/// A discovery failure is reported as a load error with no test cases; only a failure to report
/// is returned as `Err`.
#[tracing::instrument(skip_all, fields(task = %param.task_id))]
pub async fn load_test_cases(
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
    config: &Config,
    param: &EntryParam,
) -> Result<LoadResult, TestError> {
    let result = match collect_test_cases(runner, config, &param.project_path, param.selectors()).await {
        Ok(selectors) => LoadResult {
            tests: selectors.into_iter().map(TestCase::new).collect(),
            load_errors: Vec::new(),
        },
        Err(err) => {
            tracing::error!(error = %err, "test discovery failed");
            LoadResult {
                tests: Vec::new(),
                load_errors: vec![LoadError {
                    name: LOAD_ERROR_NAME.to_string(),
                    message: err.to_string(),
                }],
            }
        }
    };

    reporter.report_load_result(&result)?;
    Ok(result)
}

/// Execution entry point: run every file group and report its results.
#[tracing::instrument(skip_all, fields(task = %param.task_id))]
pub async fn run_test_cases(
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
    config: &Config,
    options: &RunOptions,
    param: &EntryParam,
) -> RunSummary {
    let groups = group_by_file(param.selectors());
    let group_runner = GroupRunner {
        builder: CommandBuilder::new(config),
        executor: ResilientExecutor::new(runner, options.executor),
        reporter,
        config,
        options,
        param,
    };

    let mut summary = RunSummary {
        groups: groups.len(),
        ..RunSummary::default()
    };
    for (file, names) in &groups {
        match group_runner.run(file, names).await {
            Ok(reported) => summary.reported += reported,
            Err(err) => {
                tracing::error!(file = %file, error = %err, "test group failed");
                summary.failures.push(GroupFailure {
                    file: file.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        groups = summary.groups,
        reported = summary.reported,
        failed = summary.failures.len(),
        "run finished"
    );
    summary
}

struct GroupRunner<'a> {
    builder: CommandBuilder<'a>,
    executor: ResilientExecutor<'a>,
    reporter: &'a dyn Reporter,
    config: &'a Config,
    options: &'a RunOptions,
    param: &'a EntryParam,
}

impl GroupRunner<'_> {
    /// Execute one group and report its results; returns the number of results reported.
    async fn run(&self, file: &str, names: &[String]) -> Result<usize, TestError> {
        let output_file = output_file_name(file);
        let built = self.builder.build(file, names, &output_file);
        tracing::info!(file, identifiers = ?built.test_identifiers, command = %built.command, "running test group");

        let records = self
            .executor
            .execute(&self.param.project_path, &built.command, &output_file)
            .await?;
        let results = normalize_records(&records);
        for result in &results {
            self.reporter.report_test_result(result)?;
        }

        if self.config.coverage {
            tokio::time::sleep(self.options.coverage_flush_delay).await;
            if let Err(err) = relocate_coverage(&self.param.project_path, &self.param.file_report_path) {
                tracing::error!(file, error = %err, "coverage relocation skipped");
            }
        }

        Ok(results.len())
    }
}
