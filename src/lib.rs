//! sortdir - sort a directory's files into category subfolders
//!
//! This library classifies the files of one directory by content type,
//! size band, or date, and relocates each into a category-named subfolder,
//! resolving name collisions and tracking outcome statistics. A thin CLI
//! drives one run at a time; dry-run and copy variants are supported.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod organizer;
pub mod output;
pub mod planner;
pub mod report;
pub mod scanner;

pub use classifier::{Category, Classifier, ContentProbe, InferProbe, OrganizeMode};
pub use config::{Config, ConfigError, FilterRules, ScanFilters};
pub use organizer::{OrganizeError, OrganizeResult, Organizer, RunStatistics, RunStatus};
pub use planner::OrganizationPlan;
pub use report::render_report;
pub use scanner::{FileEntry, scan_directory};

pub use cli::{Cli, run as run_cli};
