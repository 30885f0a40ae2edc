//! Pipeline configuration.

use std::path::PathBuf;

/// Explicit configuration for one pipeline run.
///
/// Every path the pipeline touches lives here, so nothing depends on the
/// process working directory.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory containing `features.txt`, `activity_labels.txt` and the
    /// `train/` and `test/` partition subdirectories.
    pub dataset_root: PathBuf,

    /// Destination for the tidy aggregate table. Must not already exist.
    pub output_path: PathBuf,
}

impl PipelineConfig {
    pub fn new(dataset_root: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_root: dataset_root.into(),
            output_path: output_path.into(),
        }
    }
}
