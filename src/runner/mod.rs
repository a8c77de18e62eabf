//! Jest discovery and execution pipeline.
//!
//! ## Stages
//!
//! Discovery: `discovery` (list files, scan sources) → `filter` (narrow by selectors).
//!
//! Execution, once per file group: `grouping` → `command` → `executor` (retrying, tolerant of
//! non-zero exits that still wrote a report) → `parser` → `normalize` → reporter, then `coverage`
//! when coverage is enabled.
//!
//! `pipeline` wires the stages together for the two entry points.
//!
//! ## I/O Boundaries
//!
//! Process execution goes through the [`CommandRunner`] trait and reporting through the
//! [`Reporter`] trait, so the orchestration can be exercised with scripted runners and in-memory
//! reporters. The project root is always an explicit parameter; the process working directory is
//! never changed.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod command;
pub mod coverage;
pub mod discovery;
pub mod executor;
pub mod filter;
pub mod grouping;
pub mod interfaces;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod reporter;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use interfaces::{CommandOutput, CommandRunner, ShellCommandRunner};
pub use reporter::{FileReporter, Reporter};

/// Resolve a project root against the current directory.
///
/// Jest reports absolute file paths, so a relative root (`proj`, `.`) must be made absolute before
/// paths can be expressed relative to it.
pub fn absolute_root(project_path: &Path) -> PathBuf {
    std::path::absolute(project_path).unwrap_or_else(|_| project_path.to_path_buf())
}

/// Errors raised by the discovery and execution stages.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("failed to list test files: {0}")]
    Listing(String),

    #[error("failed to read test file {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("command finished but did not write {0}")]
    OutputMissing(PathBuf),

    #[error("`{command}` failed after {attempts} attempt(s) without producing output: {source}")]
    Execution {
        command: String,
        attempts: u32,
        #[source]
        source: Box<TestError>,
    },

    #[error("failed to parse runner output {path}: {source}")]
    ParseOutput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to report {what}: {source}")]
    Report {
        what: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
