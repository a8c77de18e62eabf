//! Environment-driven configuration.
//!
//! The environment is read once, at the entry point, into a [`Config`] value that is then threaded
//! through the pipeline. Nothing below the CLI reads the environment directly.

use std::env;

/// Any non-empty value enables coverage collection.
pub const ENV_ENABLE_COVERAGE: &str = "TESTSOLAR_TTP_ENABLECOVERAGE";
/// `file` selects file-level discovery granularity.
pub const ENV_RUN_MODE: &str = "TESTSOLAR_TTP_RUN_MODE";
/// Extra arguments appended verbatim to every built command.
pub const ENV_EXTRA_ARGS: &str = "TESTSOLAR_TTP_EXTRAARGS";

/// Discovery granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Scan source files for individual test cases.
    #[default]
    Case,
    /// Report test files only, without reading their contents.
    File,
}

impl RunMode {
    fn from_env_value(value: &str) -> Self {
        if value == "file" { RunMode::File } else { RunMode::Case }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub coverage: bool,
    pub run_mode: RunMode,
    pub extra_args: String,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            coverage: lookup(ENV_ENABLE_COVERAGE).is_some_and(|v| !v.is_empty()),
            run_mode: lookup(ENV_RUN_MODE)
                .map(|v| RunMode::from_env_value(&v))
                .unwrap_or_default(),
            extra_args: lookup(ENV_EXTRA_ARGS).unwrap_or_default(),
        }
    }
}
