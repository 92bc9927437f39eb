//! Content grouping: checksum every candidate file and partition by hash.
//!
//! # Overview
//!
//! [`ContentGrouper`] is the second stage of the pipeline. It computes a
//! streamed content checksum for every [`FileRecord`] and partitions the
//! records into [`FileGroup`]s sharing a checksum. Groups are emitted in
//! first-seen order, and each group's files are placed in canonical
//! order (see [`crate::duplicates::groups`]).
//!
//! Any checksum failure aborts the whole pass: no partial group set is
//! ever returned.
//!
//! # Example
//!
//! ```no_run
//! use redup::duplicates::{filter_duplicates, ContentGrouper};
//! use redup::scanner::{FileScanner, HashAlgorithm};
//! use std::path::Path;
//!
//! let records = FileScanner::new(0).scan(Path::new(".")).unwrap();
//! let grouper = ContentGrouper::new(HashAlgorithm::Sha256);
//! let groups = grouper.group(records).unwrap();
//! let duplicates = filter_duplicates(groups);
//! println!("{} duplicate group(s)", duplicates.len());
//! ```

use std::collections::HashMap;

use crate::scanner::{ChecksumError, FileRecord, HashAlgorithm};

use super::groups::{sort_canonical, FileGroup};

/// Partitions file records into groups sharing a content checksum.
#[derive(Debug, Clone, Copy)]
pub struct ContentGrouper {
    algorithm: HashAlgorithm,
}

impl ContentGrouper {
    /// Create a grouper using the given algorithm.
    ///
    /// The algorithm set is closed; identifier validation happened when
    /// the [`HashAlgorithm`] was constructed.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The algorithm this grouper hashes with.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Checksum every record and partition into groups.
    ///
    /// Groups are returned in the order their checksum was first seen,
    /// with files in canonical order. Singleton groups are included;
    /// use [`super::filter_duplicates`] to keep only duplicates.
    ///
    /// # Errors
    ///
    /// Returns `ChecksumError` if any file becomes unreadable mid-hash.
    /// On failure the entire pass is discarded.
    pub fn group(&self, records: Vec<FileRecord>) -> Result<Vec<FileGroup>, ChecksumError> {
        log::info!(
            "Hashing {} file(s) with {}",
            records.len(),
            self.algorithm.name()
        );

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<FileGroup> = Vec::new();

        for record in records {
            log::debug!("Hashing {}", record.path.display());

            let checksum = self.algorithm.checksum_file(&record.path)?;

            match index.get(&checksum) {
                Some(&slot) => groups[slot].files.push(record),
                None => {
                    index.insert(checksum.clone(), groups.len());
                    let size = record.size;
                    groups.push(FileGroup {
                        checksum,
                        files: vec![record],
                        size,
                    });
                }
            }
        }

        for group in &mut groups {
            sort_canonical(&mut group.files);
        }

        log::info!(
            "Grouped into {} checksum group(s), {} with duplicates",
            groups.len(),
            groups.iter().filter(|g| g.has_duplicates()).count()
        );

        Ok(groups)
    }
}
