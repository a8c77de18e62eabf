//! Parsing of Jest's `--json` report into run records.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use jestx_core::selector::relative_path;
use jestx_core::{AssertionStatus, RunRecord, RunRecords, Selector, aggregate_records};
use serde::Deserialize;

use super::{TestError, absolute_root};

/// Delimiter Jest puts in front of each failed test in a suite's failure log.
const FAILURE_SECTION_MARK: char = '●';
/// Separator Jest prints between ancestor titles in failure headers.
const TITLE_SEPARATOR: &str = " › ";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JestReport {
    #[serde(default)]
    pub test_results: Vec<SuiteResult>,
}

/// One test file's results.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResult {
    /// Absolute path of the test file.
    pub name: String,
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub end_time: i64,
    /// Failure log of the whole suite.
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub assertion_results: Vec<AssertionResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult {
    pub full_name: String,
    pub status: AssertionStatus,
    #[serde(default)]
    pub failure_messages: Option<FailureMessages>,
}

/// `failureMessages` is normally a list, but older reporters emit a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FailureMessages {
    List(Vec<String>),
    Text(String),
}

impl FailureMessages {
    fn joined(&self) -> String {
        match self {
            FailureMessages::List(messages) => messages.join("\n"),
            FailureMessages::Text(message) => message.clone(),
        }
    }
}

/// Split a suite failure log into per-test sections keyed by normalized title.
///
/// Each section starts at a `●`; its first line is the test title with ` › ` separators collapsed
/// to single spaces, which matches the assertion's `fullName`.
pub fn parse_suite_logs(message: &str) -> HashMap<String, String> {
    message
        .split(FAILURE_SECTION_MARK)
        .filter(|section| !section.trim().is_empty())
        .map(|section| {
            let title = section.lines().next().unwrap_or_default().replace(TITLE_SEPARATOR, " ");
            (title.trim().to_string(), section.to_string())
        })
        .collect()
}

/// Convert a parsed report into run records keyed by `relativePath?fullName`.
///
/// ## Notes
/// - Pending assertions are skipped entirely.
/// - Failure text is the assertion's joined `failureMessages`, prefixed by the matching section
///   of the suite log when there is one.
/// - Repeated selectors are merged (see [`jestx_core::merge_record`]).
pub fn parse_report(project_path: &Path, report: &JestReport) -> RunRecords {
    let root = absolute_root(project_path);
    let entries = report.test_results.iter().flat_map(|suite| {
        let suite_logs = parse_suite_logs(suite.message.as_deref().unwrap_or_default());
        let test_path = relative_path(&root, Path::new(&suite.name));

        suite
            .assertion_results
            .iter()
            .filter(|assertion| !assertion.status.is_pending())
            .map(move |assertion| {
                let mut failure = assertion
                    .failure_messages
                    .as_ref()
                    .map(FailureMessages::joined)
                    .unwrap_or_default();
                if let Some(section) = suite_logs.get(&assertion.full_name) {
                    failure = format!("{}\n{}", section, failure);
                }

                let selector = Selector::new(&test_path, assertion.full_name.clone()).to_string();
                let record = RunRecord {
                    status: assertion.status,
                    duration: suite.end_time - suite.start_time,
                    start_time: suite.start_time,
                    end_time: suite.end_time,
                    message: failure.clone(),
                    content: failure,
                };
                (selector, record)
            })
    });

    aggregate_records(entries)
}

/// Read and parse a Jest JSON report file.
#[tracing::instrument(skip_all, fields(path = %output_path.display()))]
pub fn parse_output_file(project_path: &Path, output_path: &Path) -> Result<RunRecords, TestError> {
    let raw = fs::read_to_string(output_path)?;
    let report: JestReport = serde_json::from_str(&raw).map_err(|source| TestError::ParseOutput {
        path: output_path.to_path_buf(),
        source,
    })?;

    let records = parse_report(project_path, &report);
    tracing::info!(suites = report.test_results.len(), records = records.len(), "parsed jest report");
    Ok(records)
}
