//! The session log: an append-only CSV journaling every relocation.
//!
//! # Overview
//!
//! One session log is written per backup run, named
//! `redup-backup-<YYYYMMDDHHMMSS>.csv` in the working directory. It is
//! the only state this tool persists, and the sole input to the revert
//! engine.
//!
//! # Schema (v1)
//!
//! ```text
//! kept_path,moved_path,backup_path,checksum,timestamp
//! ```
//!
//! Paths are absolute; `timestamp` is `YYYY-MM-DDTHH:MM:SS` local time.
//! The header row is written when the file is created; one row is
//! appended per relocated file. The fixed-width timestamp embedded in
//! the filename makes lexicographic order equal chronological order,
//! which is how the most recent log is located.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Version of the session-log schema written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Session log filename prefix.
pub const LOG_PREFIX: &str = "redup-backup-";

/// Session log filename suffix.
pub const LOG_SUFFIX: &str = ".csv";

/// Column header row, written once per log file.
const HEADER: [&str; 5] = [
    "kept_path",
    "moved_path",
    "backup_path",
    "checksum",
    "timestamp",
];

/// Timestamp format used inside audit rows.
const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One relocation, as journaled in the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Absolute path of the file kept in place
    pub kept_path: String,
    /// Absolute path the duplicate was moved from
    pub moved_path: String,
    /// Absolute path the duplicate now lives at under the backup root
    pub backup_path: String,
    /// Content checksum shared by kept and moved file
    pub checksum: String,
    /// Local time the relocation was journaled
    pub timestamp: String,
}

impl AuditRecord {
    /// Create a record stamped with the current local time.
    #[must_use]
    pub fn new(kept_path: String, moved_path: String, backup_path: String, checksum: String) -> Self {
        Self {
            kept_path,
            moved_path,
            backup_path,
            checksum,
            timestamp: Local::now().format(ROW_TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Errors writing to or locating session logs.
///
/// An append failure after a successful move is a consistency gap: the
/// file is already relocated but its audit row is lost. Callers surface
/// this distinctly from a move failure.
#[derive(thiserror::Error, Debug)]
pub enum AuditLogError {
    /// The log file could not be opened or written.
    #[error("failed to write session log {path}: {source}")]
    Io {
        /// The log path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// CSV serialization failed.
    #[error("failed to serialize audit row for {path}: {source}")]
    Csv {
        /// The log path
        path: PathBuf,
        /// The underlying CSV error
        #[source]
        source: csv::Error,
    },
}

/// Append handle for one session log file.
///
/// The log is opened for append on every write; nothing else writes to
/// it during a run, so no locking is needed.
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    /// Wrap an existing or future log file path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The log path for a session timestamp, inside `dir`.
    #[must_use]
    pub fn for_timestamp(dir: &Path, timestamp: &str) -> Self {
        Self {
            path: dir.join(format!("{LOG_PREFIX}{timestamp}{LOG_SUFFIX}")),
        }
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one audit row, creating the log with its header row first
    /// if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `AuditLogError` if the log cannot be opened, the header
    /// cannot be written, or the row cannot be serialized.
    pub fn append(&self, record: &AuditRecord) -> Result<(), AuditLogError> {
        let write_header = !self.path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| AuditLogError::Io {
                path: self.path.clone(),
                source,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer
                .write_record(HEADER)
                .map_err(|source| AuditLogError::Csv {
                    path: self.path.clone(),
                    source,
                })?;
        }

        writer
            .serialize(record)
            .map_err(|source| AuditLogError::Csv {
                path: self.path.clone(),
                source,
            })?;

        writer.flush().map_err(|source| AuditLogError::Io {
            path: self.path.clone(),
            source,
        })?;

        log::debug!(
            "Journaled {} -> {}",
            record.moved_path,
            record.backup_path
        );

        Ok(())
    }
}

/// Whether a filename matches the session-log naming pattern.
#[must_use]
pub fn is_log_name(name: &str) -> bool {
    name.starts_with(LOG_PREFIX) && name.ends_with(LOG_SUFFIX)
}

/// Locate the most recent session log in `dir`.
///
/// Among files matching `redup-backup-*.csv`, the lexicographically
/// greatest name wins; the embedded fixed-width timestamp makes that the
/// chronologically newest log. Returns `None` if no log exists.
///
/// # Errors
///
/// Returns `AuditLogError::Io` if the directory cannot be read.
pub fn find_most_recent(dir: &Path) -> Result<Option<PathBuf>, AuditLogError> {
    let entries = fs::read_dir(dir).map_err(|source| AuditLogError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut newest: Option<PathBuf> = None;

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !is_log_name(name) {
            continue;
        }

        let path = entry.path();
        let newer = match &newest {
            Some(current) => path.file_name() > current.file_name(),
            None => true,
        };
        if newer {
            newest = Some(path);
        }
    }

    Ok(newest)
}
