#![forbid(unsafe_code)]
//! Jest test orchestration adapter
//!
//! Bridges a generic test-management platform and the Jest runner: discovers test cases in a
//! JavaScript/TypeScript project, executes selected cases in per-file groups, and turns Jest's
//! JSON report into the platform's normalized result documents. The shared vocabulary (selectors,
//! run records, reporting model) lives in `jestx_core`.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `runner` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a programming error (e.g. a constant regex that fails to compile),
//!   use `.expect("INVARIANT: reason")` with a clear explanation.

pub mod cli;
pub mod config;
pub mod runner;

pub use config::{Config, RunMode};
pub use runner::pipeline::{RunOptions, RunSummary, collect_test_cases, load_test_cases, run_test_cases};
pub use runner::{CommandOutput, CommandRunner, FileReporter, Reporter, ShellCommandRunner, TestError};
