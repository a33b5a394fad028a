//! Category table and file-filtering configuration.
//!
//! All classification and filtering rules live in a [`Config`] value that is
//! injected into the classifier and scanner at construction time. The
//! compiled-in defaults cover the standard category set; a TOML file passed
//! via `--config` overrides them. The tool itself never searches for or
//! writes configuration anywhere.
//!
//! # Configuration File Format
//!
//! ```toml
//! [categories]
//! Documents = ["pdf", "docx", "txt"]
//! Images = ["jpg", "png"]
//!
//! [filters]
//! skip_hidden = true
//! exclude_names = [".DS_Store", "Thumbs.db"]
//! exclude_extensions = ["tmp", "part"]
//! exclude_globs = ["*.crdownload"]
//! exclude_regexes = []
//! include_globs = []
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the given path.
    NotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    Invalid(String),
    /// A glob pattern that failed to compile.
    BadGlob(String),
    /// A regex pattern that failed to compile, with the compiler's reason.
    BadRegex { pattern: String, reason: String },
    /// IO error while reading the configuration file.
    Io(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::BadGlob(pattern) => write!(f, "Invalid glob pattern '{}'", pattern),
            ConfigError::BadRegex { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::Io(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Classification and filtering configuration.
///
/// The `categories` table maps a category name to the lowercase extensions
/// it claims. Lookup iterates the table in key order, so overlapping lists
/// resolve deterministically to the first match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Category name to extension list, used by extension-mode classification.
    #[serde(default = "default_category_table")]
    pub categories: BTreeMap<String, Vec<String>>,

    /// Rules deciding which files the scanner picks up at all.
    #[serde(default)]
    pub filters: FilterRules,
}

impl Config {
    /// Loads configuration from an explicitly supplied TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist,
    /// `ConfigError::Invalid` if TOML parsing fails, and `ConfigError::Io`
    /// if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: default_category_table(),
            filters: FilterRules::default(),
        }
    }
}

/// The standard category table.
///
/// Extensions are stored without the leading dot and matched
/// case-insensitively.
fn default_category_table() -> BTreeMap<String, Vec<String>> {
    let table: &[(&str, &[&str])] = &[
        (
            "Documents",
            &[
                "pdf", "doc", "docx", "txt", "md", "rtf", "odt", "pptx", "xlsx",
            ],
        ),
        (
            "Code",
            &[
                "py", "rs", "js", "ts", "java", "c", "cpp", "h", "go", "sh", "json", "xml",
                "yaml", "yml", "toml", "html", "css",
            ],
        ),
        (
            "Images",
            &[
                "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "tiff", "ico", "heic",
            ],
        ),
        (
            "Videos",
            &["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm"],
        ),
        ("Audio", &["mp3", "wav", "aac", "flac", "ogg", "m4a", "wma"]),
        ("Archives", &["zip", "rar", "tar", "gz", "7z", "bz2", "xz"]),
    ];

    table
        .iter()
        .map(|(name, exts)| {
            (
                name.to_string(),
                exts.iter().map(|e| e.to_string()).collect(),
            )
        })
        .collect()
}

/// Rules deciding which files are eligible for organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Skip files whose name starts with a dot. Defaults to true.
    #[serde(default = "default_skip_hidden")]
    pub skip_hidden: bool,

    /// Exact filenames to leave in place.
    #[serde(default)]
    pub exclude_names: Vec<String>,

    /// Extensions (without dot, case-insensitive) to leave in place.
    #[serde(default)]
    pub exclude_extensions: Vec<String>,

    /// Glob patterns to leave in place.
    #[serde(default)]
    pub exclude_globs: Vec<String>,

    /// Regex patterns, matched against the file name, to leave in place.
    #[serde(default)]
    pub exclude_regexes: Vec<String>,

    /// Glob patterns that override every exclusion rule.
    #[serde(default)]
    pub include_globs: Vec<String>,
}

fn default_skip_hidden() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            skip_hidden: true,
            exclude_names: Vec::new(),
            exclude_extensions: Vec::new(),
            exclude_globs: Vec::new(),
            exclude_regexes: Vec::new(),
            include_globs: Vec::new(),
        }
    }
}

/// Filter rules compiled into matchers.
///
/// Globs and regexes are validated and compiled once, before the scan
/// starts, so a bad pattern fails the run up front instead of mid-batch.
pub struct ScanFilters {
    skip_hidden: bool,
    exclude_names: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_globs: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_globs: Vec<Pattern>,
}

impl ScanFilters {
    /// Compiles filter rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error for any glob or regex pattern that fails to compile.
    pub fn compile(rules: &FilterRules) -> Result<Self, ConfigError> {
        let compile_globs = |patterns: &[String]| -> Result<Vec<Pattern>, ConfigError> {
            patterns
                .iter()
                .map(|p| Pattern::new(p).map_err(|_| ConfigError::BadGlob(p.clone())))
                .collect()
        };

        let exclude_regexes = rules
            .exclude_regexes
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::BadRegex {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden: rules.skip_hidden,
            exclude_names: rules.exclude_names.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            exclude_globs: compile_globs(&rules.exclude_globs)?,
            exclude_regexes,
            include_globs: compile_globs(&rules.include_globs)?,
        })
    }

    /// Whether a file passes the filter rules and should be organized.
    ///
    /// Checked in order with early exit: include globs (whitelist), hidden
    /// names, exact names, extensions, exclude globs, regexes, then keep.
    pub fn keeps(&self, path: &Path) -> bool {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .include_globs
            .iter()
            .any(|pattern| pattern.matches_path(path))
        {
            return true;
        }

        if self.skip_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_names.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext) {
                return false;
            }
        }

        if self
            .exclude_globs
            .iter()
            .any(|pattern| pattern.matches_path(path))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}
