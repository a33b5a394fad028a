//! The placement engine.
//!
//! Drives one organization run: scan the source directory, build the folder
//! plan, then per file classify, pick a collision-free destination name,
//! and move or copy (or only report, under dry-run). Per-file failures are
//! counted and logged; only an invalid source directory aborts a run.

use crate::classifier::{Category, Classifier, OrganizeMode};
use crate::config::{Config, ConfigError, ScanFilters};
use crate::output::OutputFormatter;
use crate::planner::OrganizationPlan;
use crate::scanner::{FileEntry, scan_directory};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised by the scanning and placement machinery.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source path is missing, unreadable, or not a directory. Fatal,
    /// raised before any file is touched.
    InvalidDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A category folder could not be created. Scoped to that category.
    FolderCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A move or copy failed. Scoped to that file.
    FileOperationFailed {
        source: PathBuf,
        destination: PathBuf,
        cause: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDirectory { path, source } => {
                write!(f, "Invalid directory {}: {}", path.display(), source)
            }
            Self::FolderCreationFailed { path, source } => {
                write!(f, "Failed to create folder {}: {}", path.display(), source)
            }
            Self::FileOperationFailed {
                source,
                destination,
                cause,
            } => {
                write!(
                    f,
                    "Failed to place {} at {}: {}",
                    source.display(),
                    destination.display(),
                    cause
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Terminal status of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The run completed, regardless of individual file errors.
    Success,
    /// No files survived the scan.
    Empty,
    /// The source directory was invalid; nothing was touched.
    Error,
}

/// Outcome counters for one run.
///
/// Created when a run starts, mutated monotonically while it proceeds, and
/// handed back to the caller once finished.
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub total_files: usize,
    pub organized_files: usize,
    pub skipped_files: usize,
    pub errors: usize,
    pub status: RunStatus,
    pub error_message: Option<String>,
}

impl RunStatistics {
    fn for_files(total_files: usize) -> Self {
        Self {
            total_files,
            organized_files: 0,
            skipped_files: 0,
            errors: 0,
            status: RunStatus::Success,
            error_message: None,
        }
    }

    fn empty() -> Self {
        Self {
            status: RunStatus::Empty,
            ..Self::for_files(0)
        }
    }

    fn failed(message: String) -> Self {
        Self {
            status: RunStatus::Error,
            error_message: Some(message),
            ..Self::for_files(0)
        }
    }
}

/// Organizes one directory's files into category subfolders.
pub struct Organizer {
    classifier: Classifier,
    filters: ScanFilters,
    copy: bool,
    dry_run: bool,
}

impl Organizer {
    /// Builds an organizer from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured filter patterns fail to
    /// compile.
    pub fn new(config: &Config, copy: bool, dry_run: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            classifier: Classifier::new(config),
            filters: ScanFilters::compile(&config.filters)?,
            copy,
            dry_run,
        })
    }

    /// Builds an organizer around an existing classifier. Used by tests to
    /// inject probe behavior.
    pub fn with_classifier(
        classifier: Classifier,
        config: &Config,
        copy: bool,
        dry_run: bool,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            classifier,
            filters: ScanFilters::compile(&config.filters)?,
            copy,
            dry_run,
        })
    }

    /// Runs one organization pass over `source_dir`.
    ///
    /// Always returns statistics: an invalid source directory yields status
    /// [`RunStatus::Error`], an empty scan yields [`RunStatus::Empty`], and
    /// anything else completes with [`RunStatus::Success`] while counting
    /// per-file failures.
    pub fn organize(&self, source_dir: &Path, mode: OrganizeMode) -> RunStatistics {
        let files = match scan_directory(source_dir, &self.filters) {
            Ok(files) => files,
            Err(e) => return RunStatistics::failed(e.to_string()),
        };

        if files.is_empty() {
            return RunStatistics::empty();
        }

        let mut plan =
            OrganizationPlan::build(source_dir, mode, &files, &self.classifier, self.dry_run);
        let mut stats = RunStatistics::for_files(files.len());

        let bar = if self.dry_run {
            None
        } else {
            Some(OutputFormatter::progress_bar(files.len() as u64))
        };

        for file in &files {
            match self.place(source_dir, file, mode, &mut plan) {
                Ok((category, _dest)) => {
                    stats.organized_files += 1;
                    let line = format!("{} {} -> {}/", self.verb(), file.name, category);
                    match &bar {
                        Some(bar) => bar.println(line),
                        None => OutputFormatter::dry_run(&line),
                    }
                }
                Err(e) => {
                    stats.errors += 1;
                    stats.skipped_files += 1;
                    OutputFormatter::error(&e.to_string());
                }
            }
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        stats
    }

    /// Places one file, returning the category and final destination.
    fn place(
        &self,
        base: &Path,
        file: &FileEntry,
        mode: OrganizeMode,
        plan: &mut OrganizationPlan,
    ) -> OrganizeResult<(Category, PathBuf)> {
        let category = self.classifier.classify(file, mode);
        let folder = plan.resolve(base, &category, self.dry_run)?;
        let destination = unique_destination(&folder, &file.name);

        if !self.dry_run {
            self.transfer(&file.path, &destination)
                .map_err(|e| OrganizeError::FileOperationFailed {
                    source: file.path.clone(),
                    destination: destination.clone(),
                    cause: e,
                })?;
        }

        Ok((category, destination))
    }

    /// Moves or copies `source` to `destination`. Moves that cross a
    /// filesystem boundary fall back to copy-then-remove.
    fn transfer(&self, source: &Path, destination: &Path) -> io::Result<()> {
        if self.copy {
            fs::copy(source, destination)?;
            return Ok(());
        }

        match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                fs::copy(source, destination)?;
                fs::remove_file(source)
            }
            Err(e) => Err(e),
        }
    }

    fn verb(&self) -> &'static str {
        match (self.dry_run, self.copy) {
            (true, true) => "Would copy",
            (true, false) => "Would move",
            (false, true) => "Copied",
            (false, false) => "Moved",
        }
    }
}

/// Returns a destination path in `folder` that no existing file occupies.
///
/// When `folder/file_name` is taken, `_1`, `_2`, ... are appended before
/// the extension until a free name is found, so nothing is overwritten.
fn unique_destination(folder: &Path, file_name: &str) -> PathBuf {
    let candidate = folder.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    let extension = name.extension().map(|e| e.to_string_lossy().to_string());

    let mut counter = 1;
    loop {
        let numbered = match &extension {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let candidate = folder.join(numbered);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn organizer(copy: bool, dry_run: bool) -> Organizer {
        let config = Config::default();
        let classifier = Classifier::with_probe(&config, None);
        Organizer::with_classifier(classifier, &config, copy, dry_run).unwrap()
    }

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn unique_destination_appends_numeric_suffix() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a.txt", b"first");

        let dest = unique_destination(temp.path(), "a.txt");
        assert_eq!(dest, temp.path().join("a_1.txt"));

        write_file(temp.path(), "a_1.txt", b"second");
        let dest = unique_destination(temp.path(), "a.txt");
        assert_eq!(dest, temp.path().join("a_2.txt"));
    }

    #[test]
    fn unique_destination_handles_missing_extension() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "README", b"readme");

        let dest = unique_destination(temp.path(), "README");
        assert_eq!(dest, temp.path().join("README_1"));
    }

    #[test]
    fn organize_moves_files_into_categories() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "notes.txt", b"text");
        write_file(temp.path(), "photo.jpg", b"not really a jpeg");

        let stats = organizer(false, false).organize(temp.path(), OrganizeMode::Extension);

        assert_eq!(stats.status, RunStatus::Success);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.organized_files, 2);
        assert_eq!(stats.errors, 0);
        assert!(temp.path().join("Documents").join("notes.txt").is_file());
        assert!(temp.path().join("Images").join("photo.jpg").is_file());
        assert!(!temp.path().join("notes.txt").exists());
    }

    #[test]
    fn organize_copy_keeps_originals() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "notes.txt", b"text");

        let stats = organizer(true, false).organize(temp.path(), OrganizeMode::Extension);

        assert_eq!(stats.organized_files, 1);
        assert!(temp.path().join("notes.txt").is_file());
        assert!(temp.path().join("Documents").join("notes.txt").is_file());
    }

    #[test]
    fn organize_resolves_collisions_without_overwriting() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("Documents")).unwrap();
        write_file(&temp.path().join("Documents"), "notes.txt", b"already there");
        write_file(temp.path(), "notes.txt", b"incoming");

        let stats = organizer(false, false).organize(temp.path(), OrganizeMode::Extension);

        assert_eq!(stats.organized_files, 1);
        let kept = fs::read(temp.path().join("Documents").join("notes.txt")).unwrap();
        assert_eq!(kept, b"already there");
        let renamed = fs::read(temp.path().join("Documents").join("notes_1.txt")).unwrap();
        assert_eq!(renamed, b"incoming");
    }

    #[test]
    fn dry_run_counts_without_touching_anything() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "notes.txt", b"text");
        write_file(temp.path(), "photo.jpg", b"pixels");

        let stats = organizer(false, true).organize(temp.path(), OrganizeMode::Extension);

        assert_eq!(stats.organized_files, 2);
        assert!(temp.path().join("notes.txt").is_file());
        assert!(temp.path().join("photo.jpg").is_file());
        assert!(!temp.path().join("Documents").exists());
        assert!(!temp.path().join("Images").exists());
    }

    #[test]
    fn empty_directory_reports_empty_status() {
        let temp = TempDir::new().unwrap();
        let stats = organizer(false, false).organize(temp.path(), OrganizeMode::Extension);

        assert_eq!(stats.status, RunStatus::Empty);
        assert_eq!(stats.total_files, 0);
        assert!(fs::read_dir(temp.path()).unwrap().next().is_none());
    }

    #[test]
    fn missing_directory_reports_error_status() {
        let stats =
            organizer(false, false).organize(Path::new("/no/such/dir"), OrganizeMode::Extension);

        assert_eq!(stats.status, RunStatus::Error);
        assert!(stats.error_message.is_some());
    }

    #[test]
    fn size_mode_places_files_into_bands() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "tiny.bin", b"tiny");
        write_file(temp.path(), "medium.bin", &vec![0u8; 2 * 1024 * 1024]);

        let stats = organizer(false, false).organize(temp.path(), OrganizeMode::Size);

        assert_eq!(stats.organized_files, 2);
        assert!(temp.path().join("Small").join("tiny.bin").is_file());
        assert!(temp.path().join("Medium").join("medium.bin").is_file());
        assert!(!temp.path().join("Large").exists());
    }

    #[test]
    fn date_mode_places_files_into_year_month_folders() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "notes.txt", b"text");

        let stats = organizer(false, false).organize(temp.path(), OrganizeMode::Date);

        assert_eq!(stats.organized_files, 1);
        let label = chrono::Local::now().format("%Y-%m").to_string();
        assert!(temp.path().join(label).join("notes.txt").is_file());
    }
}
