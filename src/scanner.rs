//! Directory scanning.
//!
//! Takes a one-shot, non-recursive snapshot of a directory's files. Files
//! created after the scan starts are not picked up within the same run.

use crate::config::ScanFilters;
use crate::organizer::{OrganizeError, OrganizeResult};
use crate::output::OutputFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// An immutable snapshot of one file's metadata, taken at scan time.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// The file name, including extension.
    pub name: String,
    /// The full path to the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Creation time, where the platform and filesystem report one.
    pub created: Option<SystemTime>,
    /// The extension, lowercased. None for files without one.
    pub extension: Option<String>,
}

impl FileEntry {
    fn from_metadata(path: PathBuf, metadata: &fs::Metadata) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());

        Self {
            name,
            path,
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            created: metadata.created().ok(),
            extension,
        }
    }
}

/// Scans `dir` and returns entries for the regular files that pass the
/// filter rules. Subdirectories are never descended into.
///
/// # Errors
///
/// Returns `OrganizeError::InvalidDirectory` when `dir` is missing, is not
/// a directory, or cannot be read. Entries whose metadata cannot be read
/// are logged and left out rather than failing the scan.
pub fn scan_directory(dir: &Path, filters: &ScanFilters) -> OrganizeResult<Vec<FileEntry>> {
    if !dir.is_dir() {
        return Err(OrganizeError::InvalidDirectory {
            path: dir.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "path is missing or not a directory",
            ),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| OrganizeError::InvalidDirectory {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !filters.keeps(&path) {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) if metadata.is_file() => {
                files.push(FileEntry::from_metadata(path, &metadata));
            }
            Ok(_) => {}
            Err(e) => {
                OutputFormatter::warning(&format!(
                    "Cannot read metadata for {}: {}",
                    path.display(),
                    e
                ));
            }
        }
    }

    Ok(files)
}
