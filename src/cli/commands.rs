//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use jestx_core::EntryParam;

use super::{CliError, CliResult, ExitCode};
use crate::config::Config;
use crate::runner::pipeline::{RunOptions, load_test_cases, run_test_cases};
use crate::runner::{FileReporter, ShellCommandRunner};

/// Maximum input descriptor size (1 MB)
const MAX_PARAM_SIZE: u64 = 1024 * 1024;

/// Read and decode the JSON input descriptor.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_PARAM_SIZE`
/// - The contents are not a valid descriptor
pub fn read_param(param_file: &Path) -> CliResult<EntryParam> {
    let shown = param_file.display();
    let metadata =
        fs::metadata(param_file).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", shown, e)))?;

    if metadata.len() > MAX_PARAM_SIZE {
        return Err(CliError::failure(format!(
            "Parameter file '{}' is too large ({} bytes, max {} bytes)",
            shown,
            metadata.len(),
            MAX_PARAM_SIZE
        )));
    }

    let raw = fs::read_to_string(param_file)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", shown, e)))?;
    EntryParam::from_json(&raw).map_err(|e| CliError::failure(format!("Invalid parameter file '{}': {}", shown, e)))
}

/// Discover test cases and write the load result.
pub async fn load_cases(param_file: &Path) -> CliResult<ExitCode> {
    let param = read_param(param_file)?;
    let config = Config::from_env();
    tracing::info!(?config, project = %param.project_path.display(), "loading test cases");

    let reporter = FileReporter::new(&param.file_report_path);
    let result = load_test_cases(&ShellCommandRunner, &reporter, &config, &param)
        .await
        .map_err(|e| CliError::failure(format!("Error reporting load result: {}", e)))?;

    if result.load_errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Run the selected test cases and write one result per test case.
pub async fn run_cases(param_file: &Path) -> CliResult<ExitCode> {
    let param = read_param(param_file)?;
    let config = Config::from_env();
    tracing::info!(?config, project = %param.project_path.display(), "running test cases");

    let reporter = FileReporter::new(&param.file_report_path);
    let summary = run_test_cases(&ShellCommandRunner, &reporter, &config, &RunOptions::default(), &param).await;

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
