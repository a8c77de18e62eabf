//! Reporting boundary.
//!
//! The pipeline only produces documents; a [`Reporter`] delivers them. [`FileReporter`] writes
//! them as JSON files under the report directory named in the input descriptor.

use std::fs;
use std::path::{Path, PathBuf};

use jestx_core::{LoadResult, TestResult};
use serde::Serialize;
use uuid::Uuid;

use super::TestError;

/// File receiving the load result.
pub const LOAD_RESULT_FILE: &str = "result.json";

pub trait Reporter {
    fn report_load_result(&self, result: &LoadResult) -> Result<(), TestError>;

    fn report_test_result(&self, result: &TestResult) -> Result<(), TestError>;
}

/// Writes reports as pretty-printed JSON files under `root`.
#[derive(Debug, Clone)]
pub struct FileReporter {
    root: PathBuf,
}

impl FileReporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Report file for one test result. Stable per test name, so a re-run overwrites it.
    pub fn test_result_path(&self, result: &TestResult) -> PathBuf {
        let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, result.test.name.as_bytes());
        self.root.join(format!("{}.json", id))
    }

    fn write_json<T: Serialize>(&self, path: &Path, what: &str, value: &T) -> Result<(), TestError> {
        let encoded = serde_json::to_vec_pretty(value)?;
        fs::create_dir_all(&self.root)
            .and_then(|()| fs::write(path, encoded))
            .map_err(|source| TestError::Report {
                what: what.to_string(),
                source,
            })
    }
}

impl Reporter for FileReporter {
    fn report_load_result(&self, result: &LoadResult) -> Result<(), TestError> {
        let path = self.root.join(LOAD_RESULT_FILE);
        self.write_json(&path, "load result", result)?;
        tracing::info!(
            tests = result.tests.len(),
            errors = result.load_errors.len(),
            path = %path.display(),
            "reported load result"
        );
        Ok(())
    }

    fn report_test_result(&self, result: &TestResult) -> Result<(), TestError> {
        let path = self.test_result_path(result);
        self.write_json(&path, &result.test.name, result)?;
        tracing::info!(test = %result.test.name, result = ?result.result_type, "reported test result");
        Ok(())
    }
}
