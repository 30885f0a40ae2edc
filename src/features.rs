//! Feature dictionary loading and mean/std selection.
//!
//! The dictionary (`features.txt`) maps 1-based column indices to feature
//! names and defines the width of every data row downstream.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{PipelineError, Result};

/// One feature dictionary entry: 1-based column index and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDef {
    pub index: usize,
    pub name: String,
}

/// Loads the feature dictionary, one `<index> <name>` pair per line.
pub fn load_dictionary(path: &Path) -> Result<Vec<FeatureDef>> {
    let file = File::open(path).map_err(|e| PipelineError::MalformedInput {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut entries = Vec::new();
    let mut seen_indices = HashSet::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| PipelineError::MalformedInput {
            path: path.to_path_buf(),
            detail: format!("line {}: {e}", lineno + 1),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (index_str, name) =
            trimmed
                .split_once(char::is_whitespace)
                .ok_or_else(|| PipelineError::MalformedInput {
                    path: path.to_path_buf(),
                    detail: format!("line {}: expected '<index> <name>'", lineno + 1),
                })?;

        let index = index_str
            .parse::<usize>()
            .map_err(|_| PipelineError::MalformedInput {
                path: path.to_path_buf(),
                detail: format!("line {}: invalid feature index '{}'", lineno + 1, index_str),
            })?;

        // Indices are 1-based column positions; zero or a repeat would
        // silently project the wrong data column downstream.
        if index == 0 {
            return Err(PipelineError::MalformedInput {
                path: path.to_path_buf(),
                detail: format!("line {}: feature index must be 1-based, got 0", lineno + 1),
            });
        }
        if !seen_indices.insert(index) {
            return Err(PipelineError::MalformedInput {
                path: path.to_path_buf(),
                detail: format!("line {}: duplicate feature index {index}", lineno + 1),
            });
        }

        entries.push(FeatureDef {
            index,
            name: name.trim().to_string(),
        });
    }

    if entries.is_empty() {
        return Err(PipelineError::MalformedInput {
            path: path.to_path_buf(),
            detail: "feature dictionary is empty".to_string(),
        });
    }

    Ok(entries)
}

/// True if a feature name is one of the mean/standard-deviation features.
///
/// Literal substring match on the parenthesized forms, so `meanFreq()` and
/// `angle(X,gravityMean)` are excluded.
pub fn is_selected(name: &str) -> bool {
    name.contains("mean()") || name.contains("std()")
}

/// Filters the dictionary to the selected features, preserving dictionary
/// order.
pub fn select(dictionary: &[FeatureDef]) -> Vec<FeatureDef> {
    dictionary
        .iter()
        .filter(|f| is_selected(&f.name))
        .cloned()
        .collect()
}
