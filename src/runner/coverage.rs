//! Relocation of Jest's Clover coverage report into the report area.
//!
//! Order matters: the artifact is copied, and only a successful copy is followed by deleting the
//! source. A failed copy leaves the artifact where Jest wrote it.

use std::fs;
use std::path::{Path, PathBuf};

use jestx_core::CoverageDescriptor;
use thiserror::Error;
use uuid::Uuid;

/// Coverage report written by `jest --collect-coverage`, relative to the project root.
pub const COVERAGE_ARTIFACT: &str = "coverage/clover.xml";
/// Directory under the project root collecting coverage descriptors.
pub const COVERAGE_INDEX_DIR: &str = "testsolar_coverage";

#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("coverage artifact not found at {0}")]
    ArtifactMissing(PathBuf),

    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write coverage descriptor {path}: {source}")]
    Descriptor {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode coverage descriptor: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Move the coverage artifact of `project_path` into `report_path` and index it.
///
/// ## Returns
/// - (`PathBuf`): the descriptor file written under [`COVERAGE_INDEX_DIR`].
///
/// ## Errors
/// - [`CoverageError::ArtifactMissing`] when Jest produced no coverage report; nothing is written.
#[tracing::instrument(skip_all, fields(project = %project_path.display()))]
pub fn relocate_coverage(project_path: &Path, report_path: &Path) -> Result<PathBuf, CoverageError> {
    let artifact = project_path.join(COVERAGE_ARTIFACT);
    if !artifact.is_file() {
        return Err(CoverageError::ArtifactMissing(artifact));
    }

    let id = Uuid::new_v4();
    let file_name = artifact
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let relocated = report_path.join(format!("{}_{}", id, file_name));

    fs::create_dir_all(report_path).map_err(|source| CoverageError::Copy {
        from: artifact.clone(),
        to: relocated.clone(),
        source,
    })?;
    fs::copy(&artifact, &relocated).map_err(|source| CoverageError::Copy {
        from: artifact.clone(),
        to: relocated.clone(),
        source,
    })?;
    fs::remove_file(&artifact).map_err(|source| CoverageError::Remove {
        path: artifact.clone(),
        source,
    })?;

    let index_dir = project_path.join(COVERAGE_INDEX_DIR);
    let descriptor_path = index_dir.join(format!("{}_coverage.json", id));
    let descriptor = CoverageDescriptor::clover(
        relocated.to_string_lossy(),
        project_path.to_string_lossy(),
    );
    let encoded = serde_json::to_vec_pretty(&descriptor)?;
    fs::create_dir_all(&index_dir)
        .and_then(|()| fs::write(&descriptor_path, encoded))
        .map_err(|source| CoverageError::Descriptor {
            path: descriptor_path.clone(),
            source,
        })?;

    tracing::info!(
        artifact = %relocated.display(),
        descriptor = %descriptor_path.display(),
        "relocated coverage report"
    );
    Ok(descriptor_path)
}
