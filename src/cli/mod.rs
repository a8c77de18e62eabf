//! CLI module for the Jest orchestration adapter
//!
//! ## Commands
//!
//! - `load <PARAM_FILE>` - Discover and filter test cases, report the load result
//! - `run <PARAM_FILE>` - Execute selected test cases, report each result
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Jest test orchestration adapter
#[derive(Parser, Debug)]
#[command(name = "jestx")]
#[command(version = VERSION)]
#[command(about = "Discover and run Jest test cases for a test platform", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover test cases and report them
    Load {
        /// JSON input descriptor
        #[arg(value_name = "PARAM_FILE")]
        param_file: PathBuf,
    },

    /// Run the selected test cases and report their results
    Run {
        /// JSON input descriptor
        #[arg(value_name = "PARAM_FILE")]
        param_file: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::failure(format!("Error starting async runtime: {}", e)))?;

    match cli.command {
        Command::Load { param_file } => runtime.block_on(commands::load_cases(&param_file)),
        Command::Run { param_file } => runtime.block_on(commands::run_cases(&param_file)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_load() {
        let cli = Cli::try_parse_from(["jestx", "load", "param.json"]).unwrap();
        if let Command::Load { param_file } = cli.command {
            assert_eq!(param_file, PathBuf::from("param.json"));
        } else {
            panic!("Expected Load command");
        }
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::try_parse_from(["jestx", "run", "/tmp/param.json"]).unwrap();
        assert!(matches!(cli.command, Command::Run { .. }));
    }

    #[test]
    fn test_cli_requires_param_file() {
        assert!(Cli::try_parse_from(["jestx", "run"]).is_err());
        assert!(Cli::try_parse_from(["jestx"]).is_err());
    }
}
