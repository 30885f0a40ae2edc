//! Pipeline orchestration: load, select, label, reshape, aggregate, write.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::aggregate;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features;
use crate::loader;
use crate::output;
use crate::reshape::{self, ActivityLabels};

/// Counts and output location of a completed run, logged as JSON.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub observations: usize,
    pub selected_features: usize,
    pub long_rows: usize,
    pub groups: usize,
    pub output_path: PathBuf,
}

/// Runs the full transformation against an already-extracted dataset and
/// writes the tidy table to the configured output path.
///
/// The overwrite guard runs first: nothing is read if the output already
/// exists. Any error aborts the run with no partial output.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    output::ensure_not_exists(&config.output_path)?;

    let dictionary = features::load_dictionary(&config.dataset_root.join("features.txt"))?;
    let selected = features::select(&dictionary);
    info!(
        total = dictionary.len(),
        selected = selected.len(),
        "Feature dictionary loaded"
    );

    let observations = loader::load_observations(&config.dataset_root, dictionary.len())?;
    let labels = ActivityLabels::load(&config.dataset_root.join("activity_labels.txt"))?;
    info!(
        observations = observations.len(),
        activities = labels.len(),
        "Dataset loaded"
    );

    let long_rows = reshape::reshape(&observations, &selected, &labels)?;
    info!(rows = long_rows.len(), "Reshaped to long form");

    let tidy = aggregate::aggregate(&long_rows)?;
    output::write_tidy(&config.output_path, &tidy)?;
    info!(
        groups = tidy.len(),
        path = %config.output_path.display(),
        "Tidy table written"
    );

    Ok(RunSummary {
        generated_at: Utc::now(),
        observations: observations.len(),
        selected_features: selected.len(),
        long_rows: long_rows.len(),
        groups: tidy.len(),
        output_path: config.output_path.clone(),
    })
}
