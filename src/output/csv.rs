//! CSV output formatter for duplicate scan results.
//!
//! One row is generated for each file in each duplicate group.
//!
//! # Columns
//!
//! - `group_id`: Numeric ID identifying the duplicate group
//! - `checksum`: Content hash (hexadecimal)
//! - `size`: File size in bytes
//! - `path`: Path to the file

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::FileGroup;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow {
    /// Unique identifier for the duplicate group
    group_id: usize,
    /// Content hash of the group (hex)
    checksum: String,
    /// File size in bytes
    size: u64,
    /// Path to the file
    path: String,
}

/// CSV output formatter.
pub struct CsvReport<'a> {
    groups: &'a [FileGroup],
}

impl<'a> CsvReport<'a> {
    /// Create a new CSV formatter over the given groups.
    #[must_use]
    pub fn new(groups: &'a [FileGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.groups.iter().enumerate() {
            let group_id = idx + 1;

            for file in &group.files {
                csv_writer.serialize(CsvRow {
                    group_id,
                    checksum: group.checksum.clone(),
                    size: group.size,
                    path: file.path.to_string_lossy().into_owned(),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate the CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileRecord;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn group(checksum: &str, paths: &[&str], size: u64) -> FileGroup {
        let now = SystemTime::now();
        FileGroup::new(
            checksum.to_string(),
            paths
                .iter()
                .map(|p| FileRecord::new(PathBuf::from(p), size, now))
                .collect(),
        )
    }

    #[test]
    fn test_csv_report_basic() {
        let groups = vec![
            group("aa11", &["/x/a.txt", "/y/a.txt"], 7),
            group("bb22", &["/x/b.txt", "/y/b.txt"], 9),
        ];

        let csv_str = CsvReport::new(&groups).to_string().unwrap();
        let lines: Vec<_> = csv_str.lines().collect();

        assert_eq!(lines[0], "group_id,checksum,size,path");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "1,aa11,7,/x/a.txt");
        assert_eq!(lines[3], "2,bb22,9,/x/b.txt");
    }

    #[test]
    fn test_csv_report_quotes_commas() {
        let groups = vec![group("cc", &["/x/with,comma.txt"], 1)];
        let csv_str = CsvReport::new(&groups).to_string().unwrap();
        assert!(csv_str.contains("\"/x/with,comma.txt\""));
    }

    #[test]
    fn test_csv_report_empty_has_no_rows() {
        let csv_str = CsvReport::new(&[]).to_string().unwrap();
        assert!(csv_str.is_empty());
    }
}
