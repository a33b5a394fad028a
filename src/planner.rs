//! Destination folder provisioning.
//!
//! An [`OrganizationPlan`] maps categories to destination folders under the
//! source directory. Extension and size modes provision upfront, creating
//! exactly the folders the scanned files need; date mode creates each
//! year-month folder lazily on first use. Which policy applies is an
//! explicit property of the plan, not a side effect of the calling code.

use crate::classifier::{Category, Classifier, OrganizeMode};
use crate::organizer::{OrganizeError, OrganizeResult};
use crate::output::OutputFormatter;
use crate::scanner::FileEntry;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-mode folder creation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provisioning {
    /// All needed folders are created before any file moves.
    Upfront,
    /// Folders are created on first use.
    Lazy,
}

/// The category-to-folder mapping for one run.
pub struct OrganizationPlan {
    folders: HashMap<Category, PathBuf>,
    policy: Provisioning,
}

impl OrganizationPlan {
    /// Builds the plan for one run.
    ///
    /// For extension and size modes the scanned files are classified first
    /// and only the categories that will actually receive a file get a
    /// folder. A category whose folder cannot be created is logged and left
    /// out of the plan; [`OrganizationPlan::resolve`] retries it per file.
    /// Under `dry_run` the mapping is computed but nothing is created.
    pub fn build(
        base: &Path,
        mode: OrganizeMode,
        files: &[FileEntry],
        classifier: &Classifier,
        dry_run: bool,
    ) -> Self {
        if mode == OrganizeMode::Date {
            return Self {
                folders: HashMap::new(),
                policy: Provisioning::Lazy,
            };
        }

        let needed: BTreeSet<Category> = files
            .iter()
            .map(|file| classifier.classify(file, mode))
            .collect();

        let mut folders = HashMap::new();
        for category in needed {
            let path = base.join(category.as_str());
            if !dry_run && let Err(e) = fs::create_dir_all(&path) {
                OutputFormatter::warning(&format!(
                    "Cannot create folder {}: {}",
                    path.display(),
                    e
                ));
                continue;
            }
            folders.insert(category, path);
        }

        Self {
            folders,
            policy: Provisioning::Upfront,
        }
    }

    /// Returns the destination folder for `category`, creating it on the
    /// fly when absent from the plan. Creation is idempotent and skipped
    /// under `dry_run`.
    pub fn resolve(
        &mut self,
        base: &Path,
        category: &Category,
        dry_run: bool,
    ) -> OrganizeResult<PathBuf> {
        if let Some(path) = self.folders.get(category) {
            return Ok(path.clone());
        }

        let path = base.join(category.as_str());
        if !dry_run {
            fs::create_dir_all(&path).map_err(|e| OrganizeError::FolderCreationFailed {
                path: path.clone(),
                source: e,
            })?;
        }
        self.folders.insert(category.clone(), path.clone());
        Ok(path)
    }

    /// Number of folders currently in the plan.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Whether this plan creates folders on first use instead of upfront.
    pub fn is_lazy(&self) -> bool {
        self.policy == Provisioning::Lazy
    }
}
