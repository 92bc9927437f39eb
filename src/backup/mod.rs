//! Backup management: relocate duplicate files and journal every move.
//!
//! # Overview
//!
//! [`BackupManager`] converts duplicate [`FileGroup`]s into filesystem
//! actions plus an audit trail:
//!
//! 1. A per-run [`BackupSession`] creates the timestamped backup root
//!    (`<base>/<YYYYMMDDHHMMSS>_backup/`) and names the session log.
//! 2. For each group, the injected [`ConfirmPolicy`] resolves which file
//!    to keep (cancel skips the group with no side effects).
//! 3. Every other file is individually confirmed, moved to a path that
//!    mirrors its absolute source path under the backup root, and
//!    journaled as one [`AuditRecord`].
//!
//! Failure to create the backup root aborts the session before any move.
//! A failed rename is recoverable: the file is reported and the batch
//! continues. A failed audit append after a successful move is a
//! consistency gap, counted separately from move failures.
//!
//! # Safety
//!
//! Files are renamed, never deleted; every relocation is reversible via
//! the session log and [`revert::RevertEngine`].

pub mod audit;
pub mod revert;

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::Local;

use crate::confirm::ConfirmPolicy;
use crate::duplicates::FileGroup;

pub use audit::{AuditLogError, AuditRecord, SessionLog};
pub use revert::{RevertEngine, RevertError, RevertOptions, RevertSummary, RowOutcome};

/// Timestamp format for backup directory and log file names.
const SESSION_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Suffix of backup root directory names.
pub const BACKUP_DIR_SUFFIX: &str = "_backup";

/// Fatal backup errors: nothing has been moved when one of these is
/// returned.
#[derive(thiserror::Error, Debug)]
pub enum BackupError {
    /// The backup root directory could not be created.
    #[error("failed to create backup directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// One backup run: owns the backup root and the session log.
#[derive(Debug, Clone)]
pub struct BackupSession {
    /// Root directory all duplicates are relocated under
    pub backup_root: PathBuf,
    /// Session log receiving one audit row per relocation
    pub log: SessionLog,
}

impl BackupSession {
    /// Create the backup root and name the session log.
    ///
    /// The root is `<base_dir>/<timestamp>_backup/`; the log is
    /// `redup-backup-<timestamp>.csv` inside `log_dir`. The log file
    /// itself is created lazily on first append.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::CreateDir` if the root cannot be created;
    /// the whole session must be aborted in that case.
    pub fn create(base_dir: &Path, log_dir: &Path) -> Result<Self, BackupError> {
        let timestamp = Local::now().format(SESSION_TIMESTAMP_FORMAT).to_string();
        let backup_root = base_dir.join(format!("{timestamp}{BACKUP_DIR_SUFFIX}"));

        fs::create_dir_all(&backup_root).map_err(|source| BackupError::CreateDir {
            path: backup_root.clone(),
            source,
        })?;

        log::info!("Backup directory created: {}", backup_root.display());

        Ok(Self {
            backup_root,
            log: SessionLog::for_timestamp(log_dir, &timestamp),
        })
    }
}

/// Outcome of one backup run, surfaced to the reporting layer.
#[derive(Debug, Clone, Default)]
pub struct BackupReport {
    /// Moves attempted after per-file confirmation
    pub attempted: usize,
    /// Files successfully relocated
    pub moved: usize,
    /// Rename or mkdir failures (file left in place)
    pub failed: usize,
    /// Audit rows lost after a successful move (consistency gap)
    pub log_failures: usize,
    /// Groups skipped by a cancel answer
    pub skipped_groups: usize,
    /// Path of the session log (may not exist if nothing was moved)
    pub log_path: PathBuf,
    /// The backup root for this run
    pub backup_root: PathBuf,
}

impl BackupReport {
    /// Whether every attempted move succeeded and was journaled.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.log_failures == 0
    }

    /// Human-readable one-line outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.log_failures > 0 {
            format!(
                "Moved {} of {} file(s), {} failed, {} move(s) missing from the session log",
                self.moved, self.attempted, self.failed, self.log_failures
            )
        } else if self.failed > 0 {
            format!(
                "Moved {} of {} file(s), {} failed",
                self.moved, self.attempted, self.failed
            )
        } else {
            format!("Moved {} file(s)", self.moved)
        }
    }
}

/// Relocates duplicate files into a backup session under a confirmation
/// policy.
pub struct BackupManager<'a> {
    base_dir: PathBuf,
    log_dir: PathBuf,
    policy: &'a mut dyn ConfirmPolicy,
}

impl<'a> BackupManager<'a> {
    /// Create a manager writing backups under `base_dir` and the session
    /// log into `log_dir`.
    pub fn new(base_dir: &Path, log_dir: &Path, policy: &'a mut dyn ConfirmPolicy) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            log_dir: log_dir.to_path_buf(),
            policy,
        }
    }

    /// Process duplicate groups: resolve the kept file per group, move
    /// the rest into the backup tree, and journal each move.
    ///
    /// An empty group list is a no-op and creates nothing on disk.
    ///
    /// # Errors
    ///
    /// Returns `BackupError` only when the backup root cannot be
    /// created. Per-file failures are recoverable and counted in the
    /// returned [`BackupReport`].
    pub fn process(&mut self, groups: &[FileGroup]) -> Result<BackupReport, BackupError> {
        if groups.is_empty() {
            return Ok(BackupReport::default());
        }

        let session = BackupSession::create(&self.base_dir, &self.log_dir)?;

        let mut report = BackupReport {
            log_path: session.log.path().to_path_buf(),
            backup_root: session.backup_root.clone(),
            ..Default::default()
        };

        for (index, group) in groups.iter().enumerate() {
            log::info!(
                "Group {} of {}: {} file(s), checksum {}",
                index + 1,
                groups.len(),
                group.len(),
                group.checksum
            );

            let kept = match self.policy.choose(&group.files) {
                Some(i) if i < group.files.len() => i,
                Some(i) => {
                    log::warn!(
                        "Keep index {} out of range for group of {}; skipping group",
                        i,
                        group.len()
                    );
                    report.skipped_groups += 1;
                    continue;
                }
                None => {
                    log::info!("Group skipped");
                    report.skipped_groups += 1;
                    continue;
                }
            };

            self.process_group(group, kept, &session, &mut report);
        }

        log::info!("{}", report.summary());

        Ok(report)
    }

    /// Move every file in `group` except the kept one.
    fn process_group(
        &mut self,
        group: &FileGroup,
        kept: usize,
        session: &BackupSession,
        report: &mut BackupReport,
    ) {
        let kept_path = absolute_path(&group.files[kept].path);

        for (i, file) in group.files.iter().enumerate() {
            if i == kept {
                continue;
            }

            if !self
                .policy
                .confirm(&format!("Move duplicate: {}?", file.path.display()))
            {
                continue;
            }

            report.attempted += 1;

            let source = absolute_path(&file.path);
            let destination = mirror_path(&session.backup_root, &source);

            if let Err(e) = move_file(&file.path, &destination) {
                log::error!("Error moving {}: {}", file.path.display(), e);
                report.failed += 1;
                continue;
            }

            report.moved += 1;
            log::info!("Moved {} -> {}", file.path.display(), destination.display());

            let record = AuditRecord::new(
                kept_path.to_string_lossy().into_owned(),
                source.to_string_lossy().into_owned(),
                absolute_path(&destination).to_string_lossy().into_owned(),
                group.checksum.clone(),
            );

            if let Err(e) = session.log.append(&record) {
                // The file is already moved; the journal is now missing
                // one row. Surfaced apart from move failures.
                log::error!(
                    "Moved {} but failed to journal it: {}",
                    file.path.display(),
                    e
                );
                report.log_failures += 1;
            }
        }
    }
}

/// Create destination parents and rename the source into the backup tree.
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(source, destination)
}

/// Mirror an absolute path beneath the backup root.
///
/// Every normal component of `absolute` is appended below `backup_root`,
/// so `/home/u/doc.txt` lands at `<root>/home/u/doc.txt`. Mirroring the
/// full source path keeps destinations unique across files from
/// different directories.
fn mirror_path(backup_root: &Path, absolute: &Path) -> PathBuf {
    let mut destination = backup_root.to_path_buf();
    for component in absolute.components() {
        if let Component::Normal(part) = component {
            destination.push(part);
        }
    }
    destination
}

/// Best-effort absolute form of a path, leaving it untouched on failure.
fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
