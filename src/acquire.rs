//! Dataset acquisition.
//!
//! Ensures an extracted copy of the source dataset exists under the data
//! directory, downloading and unzipping the archive only when the expected
//! layout is not already on disk. Reruns against an extracted dataset do no
//! network or archive work.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

/// Archive URL used when neither the CLI flag nor `HAR_DATASET_URL` is set.
pub const DEFAULT_DATASET_URL: &str =
    "https://archive.ics.uci.edu/static/public/240/human+activity+recognition+using+smartphones.zip";

/// Directory name the upstream archive extracts to.
const EXTRACTED_DIR: &str = "UCI HAR Dataset";

/// The files the pipeline reads, relative to the dataset root. Only these
/// are extracted from the archive.
const REQUIRED_FILES: &[&str] = &[
    "features.txt",
    "activity_labels.txt",
    "train/subject_train.txt",
    "train/y_train.txt",
    "train/X_train.txt",
    "test/subject_test.txt",
    "test/y_test.txt",
    "test/X_test.txt",
];

/// Returns the dataset root (the directory containing `features.txt`),
/// downloading and extracting the archive if no extracted copy is found.
pub fn ensure_dataset(data_dir: &Path, url: &str) -> Result<PathBuf> {
    if has_layout(data_dir) {
        debug!(root = %data_dir.display(), "Dataset already extracted");
        return Ok(data_dir.to_path_buf());
    }

    let extracted = data_dir.join(EXTRACTED_DIR);
    if has_layout(&extracted) {
        debug!(root = %extracted.display(), "Dataset already extracted");
        return Ok(extracted);
    }

    fs::create_dir_all(data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let archive_path = data_dir.join("dataset.zip");
    download_file(url, &archive_path)?;
    extract_archive(&archive_path, &extracted)?;
    let _ = fs::remove_file(&archive_path);

    if !has_layout(&extracted) {
        bail!(
            "archive from {} did not contain the expected dataset layout under '{}'",
            url,
            EXTRACTED_DIR
        );
    }

    info!(root = %extracted.display(), "Dataset downloaded and extracted");
    Ok(extracted)
}

/// True if `root` holds every file the pipeline reads.
fn has_layout(root: &Path) -> bool {
    REQUIRED_FILES.iter().all(|rel| root.join(rel).exists())
}

fn download_file(url: &str, dest: &Path) -> Result<()> {
    info!(url, "Downloading dataset archive");

    let resp = reqwest::blocking::get(url)
        .with_context(|| format!("requesting {url}"))?;
    if !resp.status().is_success() {
        bail!("HTTP {} for {}", resp.status(), url);
    }

    let bytes = resp
        .bytes()
        .with_context(|| format!("reading response body from {url}"))?;
    let mut file =
        File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
    file.write_all(&bytes)?;

    debug!(bytes = bytes.len(), path = %dest.display(), "Archive saved");
    Ok(())
}

/// Extracts only the required files, flattening any leading archive folder
/// so the result lands directly under `target_root`.
fn extract_archive(archive_path: &Path, target_root: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .with_context(|| format!("opening {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("reading zip archive {}", archive_path.display()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("reading entry {i} of {}", archive_path.display()))?;
        let entry_name = entry.name().to_string();

        let Some(rel) = REQUIRED_FILES
            .iter()
            .copied()
            .find(|rel| entry_name.ends_with(rel))
        else {
            continue;
        };

        let out_path = target_root.join(rel);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path)
            .with_context(|| format!("creating {}", out_path.display()))?;
        std::io::copy(&mut entry, &mut out_file)?;
        debug!(entry = entry_name, "Extracted");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_layout(root: &Path) {
        for rel in REQUIRED_FILES {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "1 placeholder\n").unwrap();
        }
    }

    #[test]
    fn test_ensure_dataset_is_idempotent_for_flat_layout() {
        let dir = tempfile::tempdir().unwrap();
        write_layout(dir.path());

        // Unroutable URL: the call must not touch the network.
        let root = ensure_dataset(dir.path(), "http://127.0.0.1:1/unused.zip").unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_ensure_dataset_finds_nested_extracted_copy() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join(EXTRACTED_DIR);
        write_layout(&nested);

        let root = ensure_dataset(dir.path(), "http://127.0.0.1:1/unused.zip").unwrap();
        assert_eq!(root, nested);
    }

    #[test]
    fn test_has_layout_requires_every_file() {
        let dir = tempfile::tempdir().unwrap();
        write_layout(dir.path());
        assert!(has_layout(dir.path()));

        fs::remove_file(dir.path().join("train/X_train.txt")).unwrap();
        assert!(!has_layout(dir.path()));
    }
}
