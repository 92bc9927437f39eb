//! Revert engine: replay a session log in reverse.
//!
//! # Overview
//!
//! [`RevertEngine`] reads a session log and moves every journaled file
//! from its backup location back to its original path. Each row's
//! outcome is independent and final — no retries:
//!
//! - a malformed row (fewer than 3 usable columns) is skipped and counted
//! - a missing backup file is skipped and counted
//! - an mkdir/rename failure is skipped and counted
//!
//! In dry-run mode nothing on disk is touched; every valid row is
//! reported as planned. After a non-dry run with zero errors and at
//! least one success, the log file is deleted and the backup root is
//! removed if empty (failure to remove it is silently ignored).
//!
//! # Example
//!
//! ```no_run
//! use redup::backup::{RevertEngine, RevertOptions};
//! use redup::confirm::AutoConfirm;
//!
//! let mut policy = AutoConfirm;
//! let options = RevertOptions::default();
//! let summary = RevertEngine::new(&mut policy).revert(&options).unwrap();
//! println!("{} reverted, {} errors", summary.succeeded, summary.errors);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::confirm::ConfirmPolicy;

use super::audit;
use super::BACKUP_DIR_SUFFIX;

/// Options for one revert invocation.
#[derive(Debug, Clone)]
pub struct RevertOptions {
    /// Explicit log file; when `None` the most recent log in `log_dir`
    /// is used.
    pub log_path: Option<PathBuf>,
    /// Directory searched for session logs.
    pub log_dir: PathBuf,
    /// Report planned reversals without touching the filesystem.
    pub dry_run: bool,
}

impl Default for RevertOptions {
    fn default() -> Self {
        Self {
            log_path: None,
            log_dir: PathBuf::from("."),
            dry_run: false,
        }
    }
}

/// Fatal revert errors: raised before any row is processed.
#[derive(thiserror::Error, Debug)]
pub enum RevertError {
    /// No session log exists in the search directory.
    #[error("no backup log files found in {0}")]
    NoLogs(PathBuf),

    /// The explicitly named log file does not exist.
    #[error("log file does not exist: {0}")]
    LogNotFound(PathBuf),

    /// The log file could not be read or parsed.
    #[error("failed to read log {path}: {source}")]
    LogRead {
        /// The log path
        path: PathBuf,
        /// The underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// Locating the most recent log failed.
    #[error(transparent)]
    Locate(#[from] audit::AuditLogError),
}

/// Final outcome of one log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Dry run: the reversal would have been performed.
    Planned,
    /// The file was moved back to its original path.
    Reverted,
    /// The row had fewer than 3 usable columns.
    Invalid,
    /// The journaled backup file no longer exists.
    MissingBackup,
    /// Creating parents or renaming failed.
    IoError(String),
}

impl RowOutcome {
    /// Whether this outcome counts as a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Planned | Self::Reverted)
    }
}

/// Report for one processed log row.
#[derive(Debug, Clone)]
pub struct RowReport {
    /// 1-based line number in the log (header is line 1)
    pub line: usize,
    /// Backup location recorded in the row
    pub backup_path: PathBuf,
    /// Original path the file is restored to
    pub restored_path: PathBuf,
    /// What happened to this row
    pub outcome: RowOutcome,
}

/// Outcome of one revert invocation, surfaced to the reporting layer.
#[derive(Debug, Clone)]
pub struct RevertSummary {
    /// The log the revert ran from
    pub log_path: PathBuf,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Whether the operator declined the revert (nothing touched)
    pub cancelled: bool,
    /// Per-row reports in log order
    pub rows: Vec<RowReport>,
    /// Rows reverted (or planned, in a dry run)
    pub succeeded: usize,
    /// Rows skipped with an error
    pub errors: usize,
    /// Whether the log file was deleted during cleanup
    pub log_deleted: bool,
    /// Whether the backup root directory was removed during cleanup
    pub backup_root_removed: bool,
}

impl RevertSummary {
    fn new(log_path: PathBuf, dry_run: bool) -> Self {
        Self {
            log_path,
            dry_run,
            cancelled: false,
            rows: Vec::new(),
            succeeded: 0,
            errors: 0,
            log_deleted: false,
            backup_root_removed: false,
        }
    }
}

/// Replays session logs in reverse under a confirmation policy.
pub struct RevertEngine<'a> {
    policy: &'a mut dyn ConfirmPolicy,
}

impl<'a> RevertEngine<'a> {
    /// Create an engine with the given confirmation policy.
    pub fn new(policy: &'a mut dyn ConfirmPolicy) -> Self {
        Self { policy }
    }

    /// Revert every relocation journaled in a session log.
    ///
    /// The log is resolved from `options` (explicit path, or the most
    /// recent log in `log_dir`). One overall confirmation gates the run
    /// when it is not a dry run; declining returns a cancelled summary
    /// with no side effects.
    ///
    /// # Errors
    ///
    /// Returns `RevertError` when no log can be located or the log
    /// cannot be read. Per-row failures are counted in the summary, not
    /// raised.
    pub fn revert(&mut self, options: &RevertOptions) -> Result<RevertSummary, RevertError> {
        let log_path = self.locate_log(options)?;

        log::info!("Reverting from log file: {}", log_path.display());

        let rows = read_rows(&log_path)?;

        let mut summary = RevertSummary::new(log_path.clone(), options.dry_run);

        if !options.dry_run
            && !self.policy.confirm(&format!(
                "Revert {} file(s) from {}?",
                rows.len(),
                log_path.display()
            ))
        {
            log::info!("Revert cancelled");
            summary.cancelled = true;
            return Ok(summary);
        }

        for (index, record) in rows.iter().enumerate() {
            // Header occupies line 1 of the file.
            let line = index + 2;
            let report = process_row(record, line, options.dry_run);

            if report.outcome.is_success() {
                summary.succeeded += 1;
            } else {
                summary.errors += 1;
            }
            summary.rows.push(report);
        }

        log::info!(
            "Revert completed: {} successful, {} errors",
            summary.succeeded,
            summary.errors
        );

        if !options.dry_run && summary.errors == 0 && summary.succeeded > 0 {
            self.cleanup(&mut summary);
        }

        Ok(summary)
    }

    /// Resolve which log file to revert from.
    fn locate_log(&self, options: &RevertOptions) -> Result<PathBuf, RevertError> {
        match &options.log_path {
            Some(path) => {
                if path.exists() {
                    Ok(path.clone())
                } else {
                    Err(RevertError::LogNotFound(path.clone()))
                }
            }
            None => audit::find_most_recent(&options.log_dir)?
                .ok_or_else(|| RevertError::NoLogs(options.log_dir.clone())),
        }
    }

    /// Delete the log and try to remove the now-empty backup root.
    fn cleanup(&self, summary: &mut RevertSummary) {
        match fs::remove_file(&summary.log_path) {
            Ok(()) => {
                log::info!("Removed log file: {}", summary.log_path.display());
                summary.log_deleted = true;
            }
            Err(e) => {
                log::warn!(
                    "Could not remove log file {}: {}",
                    summary.log_path.display(),
                    e
                );
            }
        }

        // Root removal is best-effort; a non-empty root stays in place.
        if let Some(root) = summary
            .rows
            .first()
            .and_then(|row| backup_root_of(&row.backup_path))
        {
            if fs::remove_dir(&root).is_ok() {
                log::info!("Removed empty backup directory: {}", root.display());
                summary.backup_root_removed = true;
            }
        }
    }
}

/// Read all data rows from a session log, skipping the header.
///
/// The reader is flexible: rows with unusual column counts are returned
/// as-is and judged per row.
fn read_rows(path: &Path) -> Result<Vec<csv::StringRecord>, RevertError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .map_err(|source| RevertError::LogRead {
            path: path.to_path_buf(),
            source,
        })?;

    reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| RevertError::LogRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Process one log row: validate, then restore the file (or plan to).
fn process_row(record: &csv::StringRecord, line: usize, dry_run: bool) -> RowReport {
    // Columns: kept_path, moved_path, backup_path, checksum, timestamp.
    // Only moved_path and backup_path are needed to reverse a move.
    let (Some(moved), Some(backup)) = (record.get(1), record.get(2)) else {
        log::warn!("Invalid record at line {line}");
        return RowReport {
            line,
            backup_path: PathBuf::new(),
            restored_path: PathBuf::new(),
            outcome: RowOutcome::Invalid,
        };
    };

    let restored_path = PathBuf::from(moved);
    let backup_path = PathBuf::from(backup);

    if dry_run {
        log::info!(
            "[dry-run] Would revert: {} -> {}",
            backup_path.display(),
            restored_path.display()
        );
        return RowReport {
            line,
            backup_path,
            restored_path,
            outcome: RowOutcome::Planned,
        };
    }

    if !backup_path.exists() {
        log::warn!("Backup file not found: {}", backup_path.display());
        return RowReport {
            line,
            backup_path,
            restored_path,
            outcome: RowOutcome::MissingBackup,
        };
    }

    let outcome = match restore_file(&backup_path, &restored_path) {
        Ok(()) => {
            log::info!(
                "Reverted: {} -> {}",
                backup_path.display(),
                restored_path.display()
            );
            prune_empty_parents(&backup_path);
            RowOutcome::Reverted
        }
        Err(e) => {
            log::error!("Error reverting {}: {}", backup_path.display(), e);
            RowOutcome::IoError(e.to_string())
        }
    };

    RowReport {
        line,
        backup_path,
        restored_path,
        outcome,
    }
}

/// Recreate the original parent directories and rename the file back.
fn restore_file(backup_path: &Path, restored_path: &Path) -> io::Result<()> {
    if let Some(parent) = restored_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(backup_path, restored_path)
}

/// Find the `<timestamp>_backup` ancestor of a backup file path.
fn backup_root_of(backup_path: &Path) -> Option<PathBuf> {
    backup_path
        .ancestors()
        .find(|ancestor| {
            ancestor
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(BACKUP_DIR_SUFFIX))
        })
        .map(Path::to_path_buf)
}

/// Remove now-empty mirrored directories between a restored file's
/// backup location and the backup root. Stops at the first non-empty
/// directory; every removal is best-effort.
fn prune_empty_parents(backup_path: &Path) {
    let Some(root) = backup_root_of(backup_path) else {
        return;
    };

    let mut current = backup_path.parent();
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(&root) {
            break;
        }
        if fs::remove_dir(dir).is_err() {
            break;
        }
        current = dir.parent();
    }
}
