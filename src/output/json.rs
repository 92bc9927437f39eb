//! JSON output formatter for duplicate scan results.
//!
//! Emits an array of group objects, each with its checksum, per-file
//! size, and member file list in canonical order.

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::FileGroup;

/// Errors that can occur during JSON output generation.
#[derive(Debug, Error)]
pub enum JsonOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One file within a serialized group.
#[derive(Debug, Serialize)]
struct FileInfo {
    /// Path to the file
    path: String,
    /// File size in bytes
    size: u64,
}

/// One serialized duplicate group.
#[derive(Debug, Serialize)]
struct GroupInfo {
    /// Content checksum shared by the group
    checksum: String,
    /// Per-file size in bytes
    size: u64,
    /// Member files, canonical candidate first
    files: Vec<FileInfo>,
}

/// JSON output formatter.
pub struct JsonReport<'a> {
    groups: &'a [FileGroup],
}

impl<'a> JsonReport<'a> {
    /// Create a new JSON formatter over the given groups.
    #[must_use]
    pub fn new(groups: &'a [FileGroup]) -> Self {
        Self { groups }
    }

    /// Write pretty-printed JSON to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `JsonOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> Result<(), JsonOutputError> {
        let groups: Vec<GroupInfo> = self
            .groups
            .iter()
            .map(|group| GroupInfo {
                checksum: group.checksum.clone(),
                size: group.size,
                files: group
                    .files
                    .iter()
                    .map(|f| FileInfo {
                        path: f.path.to_string_lossy().into_owned(),
                        size: f.size,
                    })
                    .collect(),
            })
            .collect();

        serde_json::to_writer_pretty(&mut writer, &groups)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Generate the JSON output as a string.
    ///
    /// # Errors
    ///
    /// Returns `JsonOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, JsonOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
