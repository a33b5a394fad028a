//! Command-line interface.
//!
//! Parses the command surface, wires configuration into the placement
//! engine, runs one organization pass, and maps the terminal status to an
//! exit code: 0 for Success and Empty, 1 for Error.

use crate::classifier::OrganizeMode;
use crate::config::Config;
use crate::organizer::{Organizer, RunStatus};
use crate::output::OutputFormatter;
use crate::report::render_report;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Sort the files of a directory into category subfolders.
#[derive(Debug, Parser)]
#[command(name = "sortdir", version, about)]
#[command(group = ArgGroup::new("mode").multiple(false))]
pub struct Cli {
    /// Directory path to organize
    pub directory: PathBuf,

    /// Organize files by type (default)
    #[arg(long = "by-type", group = "mode")]
    pub by_type: bool,

    /// Organize files by date
    #[arg(long = "by-date", group = "mode")]
    pub by_date: bool,

    /// Organize files by size
    #[arg(long = "by-size", group = "mode")]
    pub by_size: bool,

    /// Copy files instead of moving them
    #[arg(long)]
    pub copy: bool,

    /// Show what would be done without making changes
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print a report after organizing files
    #[arg(long)]
    pub report: bool,

    /// TOML file overriding the category table and filter rules
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The selected organization mode, defaulting to extension.
    pub fn mode(&self) -> OrganizeMode {
        if self.by_date {
            OrganizeMode::Date
        } else if self.by_size {
            OrganizeMode::Size
        } else {
            OrganizeMode::Extension
        }
    }
}

/// Runs one organization pass for the parsed arguments and returns the
/// process exit code.
pub fn run(cli: &Cli) -> u8 {
    let config = match &cli.config {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            return 1;
        }
    };

    let organizer = match Organizer::new(&config, cli.copy, cli.dry_run) {
        Ok(organizer) => organizer,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            return 1;
        }
    };

    let mode = cli.mode();
    OutputFormatter::info(&format!(
        "Organizing files in '{}' by {}...",
        cli.directory.display(),
        mode
    ));
    if cli.dry_run {
        OutputFormatter::dry_run("No changes will be made.");
    }

    let stats = organizer.organize(&cli.directory, mode);

    match stats.status {
        RunStatus::Error => {
            OutputFormatter::error(
                stats
                    .error_message
                    .as_deref()
                    .unwrap_or("Organization failed"),
            );
            1
        }
        RunStatus::Empty => {
            OutputFormatter::success("Done! No files to organize.");
            0
        }
        RunStatus::Success => {
            OutputFormatter::success(&format!(
                "Done! Organized {} of {} files.",
                stats.organized_files, stats.total_files
            ));
            if stats.skipped_files > 0 {
                OutputFormatter::warning(&format!("Skipped {} files.", stats.skipped_files));
            }
            if stats.errors > 0 {
                OutputFormatter::warning(&format!("Encountered {} errors.", stats.errors));
            }
            if cli.report {
                println!("\n{}", render_report(&stats, &cli.directory, mode));
            }
            0
        }
    }
}
