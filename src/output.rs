//! Output formatting and persistence for the tidy table.
//!
//! Supports the overwrite guard, tab-separated file output, and JSON
//! logging of the run summary.

use std::path::Path;

use anyhow::Result as AnyResult;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::TidyRow;
use crate::error::{PipelineError, Result};

/// Fails if the output path already exists. Called before any processing so
/// a rerun never clobbers an earlier result.
pub fn ensure_not_exists(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(PipelineError::OutputAlreadyExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Writes the tidy table as a tab-separated file with a header row, one
/// data row per aggregate group, numeric values in default decimal
/// notation, no quoting.
pub fn write_tidy(path: &Path, rows: &[TidyRow]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing tidy table");

    let mut writer = WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Logs a serializable summary as pretty-printed JSON.
pub fn print_json<T: Serialize>(summary: &T) -> AnyResult<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
