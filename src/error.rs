//! Error types for the tidy-dataset pipeline.
//!
//! Every detected inconsistency is fatal to the run: the pipeline is a
//! one-shot batch job and never emits partial output.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`PipelineError`].
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while transforming the dataset.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Missing file, wrong column count, line-count mismatch, or an
    /// unparseable field. `detail` carries the line number where one applies.
    #[error("malformed input in {}: {detail}", path.display())]
    MalformedInput { path: PathBuf, detail: String },

    /// An activity code with no entry in the activity dictionary.
    #[error("unknown activity code {code} at observation row {row}: no entry in {}", path.display())]
    UnknownActivity { code: u32, row: usize, path: PathBuf },

    /// Two distinct feature names decomposed to the same facet tuple, so
    /// aggregating over facets would silently merge them.
    #[error("facet collision: '{first}' and '{second}' decompose to the same facet tuple")]
    CategorizationCollision { first: String, second: String },

    /// A feature name matching neither alternative of a mandatory facet.
    #[error("feature '{name}' matches no known {facet} pattern")]
    UncategorizableFeature { name: String, facet: &'static str },

    /// The output path is already present; the pipeline refuses to overwrite.
    #[error("output file {} already exists, refusing to overwrite", path.display())]
    OutputAlreadyExists { path: PathBuf },

    /// CSV serialization error while writing the output table.
    #[error("output write error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
