//! Raw dataset loading.
//!
//! Reads the subject, activity-label and feature-vector files of both the
//! train and test partitions and concatenates them into one row set, train
//! rows first. Each partition's three files must be line-aligned.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{PipelineError, Result};

/// One recording: subject, activity code and the full feature vector.
#[derive(Debug, Clone)]
pub struct RawObservation {
    pub subject_id: u32,
    pub activity_code: u32,
    pub values: Vec<f64>,
}

const PARTITIONS: &[&str] = &["train", "test"];

/// Loads both partitions under `root`. `width` is the required column count
/// of every data row (the feature dictionary length).
///
/// No partial result on failure: any malformed file aborts the whole load.
pub fn load_observations(root: &Path, width: usize) -> Result<Vec<RawObservation>> {
    let mut observations = Vec::new();
    for partition in PARTITIONS {
        let rows = load_partition(root, partition, width)?;
        info!(partition, rows = rows.len(), "Partition loaded");
        observations.extend(rows);
    }
    Ok(observations)
}

fn load_partition(root: &Path, partition: &str, width: usize) -> Result<Vec<RawObservation>> {
    let dir = root.join(partition);
    let subject_path = dir.join(format!("subject_{partition}.txt"));
    let activity_path = dir.join(format!("y_{partition}.txt"));
    let data_path = dir.join(format!("X_{partition}.txt"));

    let subjects = read_int_column(&subject_path)?;
    let activities = read_int_column(&activity_path)?;
    let rows = read_data_rows(&data_path, width)?;

    if subjects.len() != rows.len() || activities.len() != rows.len() {
        return Err(PipelineError::MalformedInput {
            path: dir,
            detail: format!(
                "line counts disagree: {} subjects, {} activity codes, {} data rows",
                subjects.len(),
                activities.len(),
                rows.len()
            ),
        });
    }

    Ok(subjects
        .into_iter()
        .zip(activities)
        .zip(rows)
        .map(|((subject_id, activity_code), values)| RawObservation {
            subject_id,
            activity_code,
            values,
        })
        .collect())
}

/// Reads a single-column file of integers (subject IDs or activity codes).
fn read_int_column(path: &Path) -> Result<Vec<u32>> {
    let file = File::open(path).map_err(|e| PipelineError::MalformedInput {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut values = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| PipelineError::MalformedInput {
            path: path.to_path_buf(),
            detail: format!("line {}: {e}", lineno + 1),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed
            .parse::<u32>()
            .map_err(|_| PipelineError::MalformedInput {
                path: path.to_path_buf(),
                detail: format!("line {}: expected an integer, got '{}'", lineno + 1, trimmed),
            })?;
        values.push(value);
    }
    Ok(values)
}

/// Reads a whitespace-delimited data file, enforcing `width` columns per row.
fn read_data_rows(path: &Path, width: usize) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path).map_err(|e| PipelineError::MalformedInput {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut rows = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| PipelineError::MalformedInput {
            path: path.to_path_buf(),
            detail: format!("line {}: {e}", lineno + 1),
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let mut values = Vec::with_capacity(width);
        for field in line.split_whitespace() {
            let value = field
                .parse::<f64>()
                .map_err(|_| PipelineError::MalformedInput {
                    path: path.to_path_buf(),
                    detail: format!("line {}: invalid number '{}'", lineno + 1, field),
                })?;
            values.push(value);
        }

        if values.len() != width {
            return Err(PipelineError::MalformedInput {
                path: path.to_path_buf(),
                detail: format!(
                    "line {}: expected {} columns, found {}",
                    lineno + 1,
                    width,
                    values.len()
                ),
            });
        }
        rows.push(values);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_partition(
        root: &Path,
        partition: &str,
        subjects: &[u32],
        activities: &[u32],
        rows: &[&str],
    ) -> PathBuf {
        let dir = root.join(partition);
        fs::create_dir_all(&dir).unwrap();
        let lines = |xs: &[u32]| {
            xs.iter()
                .map(|x| x.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        };
        fs::write(dir.join(format!("subject_{partition}.txt")), lines(subjects)).unwrap();
        fs::write(dir.join(format!("y_{partition}.txt")), lines(activities)).unwrap();
        fs::write(dir.join(format!("X_{partition}.txt")), rows.join("\n")).unwrap();
        dir
    }

    #[test]
    fn test_load_concatenates_train_then_test() {
        let dir = tempfile::tempdir().unwrap();
        write_partition(dir.path(), "train", &[1, 1], &[1, 2], &["0.1 0.2", "0.3 0.4"]);
        write_partition(dir.path(), "test", &[9], &[1], &["0.5 0.6"]);

        let obs = load_observations(dir.path(), 2).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].subject_id, 1);
        assert_eq!(obs[1].activity_code, 2);
        assert_eq!(obs[2].subject_id, 9);
        assert_eq!(obs[2].values, vec![0.5, 0.6]);
    }

    #[test]
    fn test_missing_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write_partition(dir.path(), "train", &[1], &[1], &["0.1 0.2"]);
        // no test/ partition at all

        let err = load_observations(dir.path(), 2).unwrap_err();
        assert!(err.to_string().contains("subject_test.txt"));
    }

    #[test]
    fn test_wrong_column_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_partition(dir.path(), "train", &[1], &[1], &["0.1 0.2 0.3"]);
        write_partition(dir.path(), "test", &[2], &[1], &["0.4 0.5"]);

        let err = load_observations(dir.path(), 2).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("X_train.txt"));
        assert!(msg.contains("expected 2 columns, found 3"));
    }

    #[test]
    fn test_line_count_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_partition(dir.path(), "train", &[1, 2], &[1], &["0.1 0.2", "0.3 0.4"]);
        write_partition(dir.path(), "test", &[3], &[1], &["0.5 0.6"]);

        let err = load_observations(dir.path(), 2).unwrap_err();
        assert!(err.to_string().contains("line counts disagree"));
    }

    #[test]
    fn test_unreadable_data_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write_partition(dir.path(), "train", &[1], &[1], &["0.1 0.2"]);
        write_partition(dir.path(), "test", &[2], &[1], &["0.4 0.5"]);
        // Invalid UTF-8 makes the read itself fail partway through.
        fs::write(dir.path().join("test/X_test.txt"), [0xFF, 0xFE, 0x0A]).unwrap();

        let err = load_observations(dir.path(), 2).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
        assert!(msg.contains("X_test.txt"));
    }

    #[test]
    fn test_unparseable_field_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        write_partition(dir.path(), "train", &[1], &[1], &["0.1 oops"]);
        write_partition(dir.path(), "test", &[2], &[1], &["0.4 0.5"]);

        let err = load_observations(dir.path(), 2).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 1"));
        assert!(msg.contains("oops"));
    }
}
