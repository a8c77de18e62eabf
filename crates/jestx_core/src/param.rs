//! Input descriptor handed to both entry points.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Pipe file contents describing one discovery or execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntryParam {
    /// Selectors to load or run. `null` and a missing key both mean "no selectors".
    #[serde(default)]
    pub test_selectors: Option<Vec<String>>,
    pub project_path: PathBuf,
    #[serde(default)]
    pub task_id: String,
    pub file_report_path: PathBuf,
}

impl EntryParam {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn selectors(&self) -> &[String] {
        self.test_selectors.as_deref().unwrap_or_default()
    }
}
