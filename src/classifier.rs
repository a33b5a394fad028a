//! File classification.
//!
//! Maps a scanned file to the category label that names its destination
//! subfolder. Three strategies are selectable at run time:
//!
//! - extension mode: content-type probe, then a short common-media
//!   extension heuristic, then the configured extension table, then
//!   [`Category::OTHER`],
//! - size mode: MiB bands (Small, Medium, Large),
//! - date mode: year-month labels from the file's creation time.
//!
//! # Examples
//!
//! ```
//! use sortdir::classifier::Classifier;
//! use sortdir::config::Config;
//!
//! let classifier = Classifier::new(&Config::default());
//! assert_eq!(classifier.category_for_extension("pdf").unwrap().as_str(), "Documents");
//! ```

use crate::config::Config;
use crate::scanner::FileEntry;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

const MIB: u64 = 1024 * 1024;

/// Inclusive lower bound of the Medium size band.
pub const MEDIUM_THRESHOLD: u64 = MIB;
/// Inclusive lower bound of the Large size band.
pub const LARGE_THRESHOLD: u64 = 100 * MIB;

/// The selected organization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeMode {
    /// Group by content type and extension.
    Extension,
    /// Group into Small/Medium/Large bands.
    Size,
    /// Group by year-month of the creation time.
    Date,
}

impl OrganizeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizeMode::Extension => "extension",
            OrganizeMode::Size => "size",
            OrganizeMode::Date => "date",
        }
    }
}

impl fmt::Display for OrganizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The label naming a file's destination subfolder.
///
/// Derived per file, never stored. Extension mode draws labels from the
/// configured table, size mode from the three bands, date mode generates
/// `YYYY-MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(String);

impl Category {
    /// Label for files no strategy could place.
    pub const OTHER: &'static str = "Other";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn other() -> Self {
        Self::new(Self::OTHER)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A strategy that inspects file contents for a MIME type.
///
/// Implementations must be best-effort: any failure is reported as `None`
/// and classification falls through to the next strategy, never to the
/// caller as an error.
pub trait ContentProbe {
    /// Returns the detected MIME type, or `None` when detection fails for
    /// any reason.
    fn detect_mime(&self, path: &Path) -> Option<String>;
}

/// Content probe backed by signature sniffing of the leading bytes.
pub struct InferProbe;

impl ContentProbe for InferProbe {
    fn detect_mime(&self, path: &Path) -> Option<String> {
        let mut header = [0u8; 8192];
        let mut file = std::fs::File::open(path).ok()?;
        let read = file.read(&mut header).ok()?;
        infer::get(&header[..read]).map(|kind| kind.mime_type().to_string())
    }
}

/// MIME types with an exact category assignment. Prefixes such as `image/`
/// are handled separately.
const MIME_CATEGORIES: &[(&str, &str)] = &[
    ("application/pdf", "Documents"),
    ("application/msword", "Documents"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "Documents",
    ),
    ("application/rtf", "Documents"),
    ("application/zip", "Archives"),
    ("application/vnd.rar", "Archives"),
    ("application/x-rar-compressed", "Archives"),
    ("application/x-7z-compressed", "Archives"),
    ("application/x-tar", "Archives"),
    ("application/gzip", "Archives"),
    ("application/x-bzip2", "Archives"),
    ("application/x-xz", "Archives"),
    ("application/json", "Code"),
    ("application/javascript", "Code"),
    ("text/html", "Code"),
];

/// Extensions classified ahead of the configured table when the content
/// probe is inconclusive.
const COMMON_MEDIA: &[(&str, &str)] = &[
    ("jpg", "Images"),
    ("jpeg", "Images"),
    ("png", "Images"),
    ("gif", "Images"),
    ("mp3", "Audio"),
    ("wav", "Audio"),
    ("mp4", "Videos"),
    ("mov", "Videos"),
    ("avi", "Videos"),
];

/// Classifies files under the selected mode.
///
/// Holds the injected category table and an optional content probe. Pure
/// apart from the probe, whose failures degrade to the next strategy.
pub struct Classifier {
    categories: BTreeMap<String, Vec<String>>,
    probe: Option<Box<dyn ContentProbe>>,
}

impl Classifier {
    /// Creates a classifier over the configured category table, probing
    /// file contents with [`InferProbe`].
    pub fn new(config: &Config) -> Self {
        Self::with_probe(config, Some(Box::new(InferProbe)))
    }

    /// Creates a classifier with an explicit probe, or none at all.
    pub fn with_probe(config: &Config, probe: Option<Box<dyn ContentProbe>>) -> Self {
        let categories = config
            .categories
            .iter()
            .map(|(name, exts)| {
                (
                    name.clone(),
                    exts.iter().map(|e| e.to_lowercase()).collect(),
                )
            })
            .collect();

        Self { categories, probe }
    }

    /// Returns the category for `entry` under `mode`.
    pub fn classify(&self, entry: &FileEntry, mode: OrganizeMode) -> Category {
        match mode {
            OrganizeMode::Extension => self.classify_by_type(entry),
            OrganizeMode::Size => size_band(entry.size),
            OrganizeMode::Date => date_label(entry),
        }
    }

    /// Extension-mode strategy chain, in fixed priority order.
    fn classify_by_type(&self, entry: &FileEntry) -> Category {
        if let Some(probe) = &self.probe
            && let Some(mime) = probe.detect_mime(&entry.path)
            && let Some(category) = mime_category(&mime)
        {
            return category;
        }

        if let Some(ext) = entry.extension.as_deref() {
            if let Some(category) = common_media_category(ext) {
                return category;
            }
            if let Some(category) = self.category_for_extension(ext) {
                return category;
            }
        }

        Category::other()
    }

    /// Looks up an extension in the configured table, case-insensitively.
    /// The first category whose list contains the extension wins.
    pub fn category_for_extension(&self, ext: &str) -> Option<Category> {
        let ext = ext.to_lowercase();
        self.categories
            .iter()
            .find(|(_, exts)| exts.iter().any(|e| *e == ext))
            .map(|(name, _)| Category::new(name.clone()))
    }
}

fn mime_category(mime: &str) -> Option<Category> {
    let mime = mime.to_lowercase();
    if let Some((_, name)) = MIME_CATEGORIES.iter().find(|(m, _)| *m == mime) {
        return Some(Category::new(*name));
    }

    match mime.split('/').next() {
        Some("image") => Some(Category::new("Images")),
        Some("video") => Some(Category::new("Videos")),
        Some("audio") => Some(Category::new("Audio")),
        _ => None,
    }
}

fn common_media_category(ext: &str) -> Option<Category> {
    let ext = ext.to_lowercase();
    COMMON_MEDIA
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, name)| Category::new(*name))
}

/// Size bands are inclusive-exclusive: `< 1 MiB` Small, `< 100 MiB`
/// Medium, anything at or above that Large.
fn size_band(size: u64) -> Category {
    if size < MEDIUM_THRESHOLD {
        Category::new("Small")
    } else if size < LARGE_THRESHOLD {
        Category::new("Medium")
    } else {
        Category::new("Large")
    }
}

/// Year-month label from the creation time, in local time. Falls back to
/// the modification time where the platform reports no creation time.
fn date_label(entry: &FileEntry) -> Category {
    let stamp = entry.created.unwrap_or(entry.modified);
    let local: DateTime<Local> = DateTime::from(stamp);
    Category::new(local.format("%Y-%m").to_string())
}
