//! Command-line interface definitions.
//!
//! All CLI arguments, subcommands, and options using the clap derive
//! API: global options (verbosity, JSON errors) plus the `scan` and
//! `revert` subcommands. Running with no subcommand starts the
//! interactive menu.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory and report duplicates
//! redup scan ~/Downloads
//!
//! # Scan with MD5 and a size floor, answering yes everywhere
//! redup scan ~/Downloads --checksum md5 --min-size 1MB --yes
//!
//! # Undo the most recent backup run
//! redup revert
//!
//! # Simulate a revert from a specific log
//! redup revert redup-backup-20260625160855.csv --dry-run
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::scanner::HashAlgorithm;

/// Duplicate file manager with reversible, audit-logged backups.
///
/// redup groups files by content hash, relocates redundant copies into a
/// timestamped backup directory, and journals every move into a CSV
/// session log that `redup revert` can replay exactly.
#[derive(Debug, Parser)]
#[command(name = "redup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute; omit for the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files and back up the redundant copies
    Scan(ScanArgs),
    /// Revert files from backup using a session log
    Revert(RevertArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan for duplicates
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Checksum algorithm used to group files
    #[arg(long, value_enum, default_value = "sha256")]
    pub checksum: ChecksumArg,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size, default_value = "0")]
    pub min_size: u64,

    /// Base directory for the timestamped backup root
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub backup_dir: PathBuf,

    /// Report duplicates without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output format for the duplicate report
    #[arg(short, long, value_enum, default_value = "summary")]
    pub output: OutputFormat,

    /// Skip all prompts: keep the canonical candidate and move the rest
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the revert subcommand.
#[derive(Debug, Args)]
pub struct RevertArgs {
    /// Session log to revert from; defaults to the most recent one
    #[arg(value_name = "LOG_FILE")]
    pub log: Option<PathBuf>,

    /// Simulate the revert without moving files
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Checksum algorithm choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChecksumArg {
    /// SHA-256 (default)
    Sha256,
    /// MD5
    Md5,
}

impl From<ChecksumArg> for HashAlgorithm {
    fn from(arg: ChecksumArg) -> Self {
        match arg {
            ChecksumArg::Sha256 => HashAlgorithm::Sha256,
            ChecksumArg::Md5 => HashAlgorithm::Md5,
        }
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Summary,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Summary => write!(f, "summary"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB.
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use redup::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
