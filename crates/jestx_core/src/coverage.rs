//! Coverage descriptor written next to a relocated coverage artifact.

use serde::{Deserialize, Serialize};

/// Format tag for Clover XML coverage reports.
pub const COVERAGE_TYPE_CLOVER: &str = "clover";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageDescriptor {
    /// Where the artifact lives after relocation.
    pub coverage_file: String,
    pub coverage_type: String,
    pub project_path: String,
}

impl CoverageDescriptor {
    pub fn clover(coverage_file: impl Into<String>, project_path: impl Into<String>) -> Self {
        Self {
            coverage_file: coverage_file.into(),
            coverage_type: COVERAGE_TYPE_CLOVER.to_string(),
            project_path: project_path.into(),
        }
    }
}
