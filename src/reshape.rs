//! Activity labeling and wide-to-long reshape.
//!
//! Joins each observation's activity code to its descriptive name, projects
//! onto the selected feature columns and fans each observation out into one
//! long row per (observation, selected feature) pair.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::features::FeatureDef;
use crate::loader::RawObservation;

/// Activity code to name dictionary, keeping its source path for error
/// reporting.
#[derive(Debug)]
pub struct ActivityLabels {
    path: PathBuf,
    map: HashMap<u32, String>,
}

impl ActivityLabels {
    /// Loads `activity_labels.txt`, one `<code> <NAME>` pair per line.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PipelineError::MalformedInput {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        let mut map = HashMap::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| PipelineError::MalformedInput {
                path: path.to_path_buf(),
                detail: format!("line {}: {e}", lineno + 1),
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (code_str, name) =
                trimmed
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| PipelineError::MalformedInput {
                        path: path.to_path_buf(),
                        detail: format!("line {}: expected '<code> <name>'", lineno + 1),
                    })?;

            let code = code_str
                .parse::<u32>()
                .map_err(|_| PipelineError::MalformedInput {
                    path: path.to_path_buf(),
                    detail: format!("line {}: invalid activity code '{}'", lineno + 1, code_str),
                })?;

            map.insert(code, name.trim().to_string());
        }

        if map.is_empty() {
            return Err(PipelineError::MalformedInput {
                path: path.to_path_buf(),
                detail: "activity dictionary is empty".to_string(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    pub fn get(&self, code: u32) -> Option<&str> {
        self.map.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// One row of the long-form table.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub subject_id: u32,
    pub activity: String,
    pub feature: String,
    pub value: f64,
}

/// Fans each observation out into one [`LongRow`] per selected feature, in
/// (observation, feature) order.
///
/// Total and exhaustive: the result always holds exactly
/// `observations.len() * selected.len()` rows. An activity code missing
/// from the dictionary aborts the reshape.
pub fn reshape(
    observations: &[RawObservation],
    selected: &[FeatureDef],
    labels: &ActivityLabels,
) -> Result<Vec<LongRow>> {
    let mut rows = Vec::with_capacity(observations.len() * selected.len());

    for (row_idx, obs) in observations.iter().enumerate() {
        let activity =
            labels
                .get(obs.activity_code)
                .ok_or_else(|| PipelineError::UnknownActivity {
                    code: obs.activity_code,
                    row: row_idx + 1,
                    path: labels.path.clone(),
                })?;

        for feature in selected {
            // 1-based dictionary index; the loader has already enforced the
            // row width, so this only trips on an inconsistent dictionary.
            let value = feature
                .index
                .checked_sub(1)
                .and_then(|i| obs.values.get(i))
                .copied()
                .ok_or_else(|| PipelineError::MalformedInput {
                    path: labels.path.clone(),
                    detail: format!(
                        "feature '{}' has column index {} but observations have {} columns",
                        feature.name,
                        feature.index,
                        obs.values.len()
                    ),
                })?;

            rows.push(LongRow {
                subject_id: obs.subject_id,
                activity: activity.to_string(),
                feature: feature.name.clone(),
                value,
            });
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn labels_fixture(entries: &str) -> ActivityLabels {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity_labels.txt");
        fs::write(&path, entries).unwrap();
        ActivityLabels::load(&path).unwrap()
    }

    fn obs(subject_id: u32, activity_code: u32, values: &[f64]) -> RawObservation {
        RawObservation {
            subject_id,
            activity_code,
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_load_activity_labels() {
        let labels = labels_fixture("1 WALKING\n2 SITTING\n");
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get(1), Some("WALKING"));
        assert_eq!(labels.get(3), None);
    }

    #[test]
    fn test_row_count_is_observations_times_features() {
        let labels = labels_fixture("1 WALKING\n");
        let selected = vec![
            FeatureDef { index: 1, name: "tBodyAcc-mean()-X".into() },
            FeatureDef { index: 3, name: "tBodyAcc-std()-X".into() },
        ];
        let observations = vec![
            obs(1, 1, &[0.1, 0.2, 0.3]),
            obs(2, 1, &[0.4, 0.5, 0.6]),
            obs(1, 1, &[0.7, 0.8, 0.9]),
        ];

        let rows = reshape(&observations, &selected, &labels).unwrap();
        assert_eq!(rows.len(), observations.len() * selected.len());
    }

    #[test]
    fn test_projection_uses_dictionary_index() {
        let labels = labels_fixture("1 WALKING\n");
        let selected = vec![FeatureDef { index: 3, name: "tBodyAcc-std()-X".into() }];
        let observations = vec![obs(7, 1, &[0.1, 0.2, 0.3])];

        let rows = reshape(&observations, &selected, &labels).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject_id, 7);
        assert_eq!(rows[0].activity, "WALKING");
        assert_eq!(rows[0].feature, "tBodyAcc-std()-X");
        assert_eq!(rows[0].value, 0.3);
    }

    #[test]
    fn test_unknown_activity_code_is_reported() {
        let labels = labels_fixture("1 WALKING\n");
        let selected = vec![FeatureDef { index: 1, name: "tBodyAcc-mean()-X".into() }];
        let observations = vec![obs(1, 1, &[0.1]), obs(2, 9, &[0.2])];

        let err = reshape(&observations, &selected, &labels).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown activity code 9"));
        assert!(msg.contains("row 2"));
    }

    #[test]
    fn test_zero_feature_index_is_rejected_not_a_panic() {
        let labels = labels_fixture("1 WALKING\n");
        let selected = vec![FeatureDef { index: 0, name: "tBodyAcc-mean()-X".into() }];
        let observations = vec![obs(1, 1, &[0.1, 0.2])];

        let err = reshape(&observations, &selected, &labels).unwrap_err();
        assert!(err.to_string().contains("column index 0"));
    }

    #[test]
    fn test_out_of_range_feature_index_is_rejected() {
        let labels = labels_fixture("1 WALKING\n");
        let selected = vec![FeatureDef { index: 5, name: "tBodyAcc-mean()-X".into() }];
        let observations = vec![obs(1, 1, &[0.1, 0.2])];

        let err = reshape(&observations, &selected, &labels).unwrap_err();
        assert!(err.to_string().contains("column index 5"));
    }
}
