//! Directory walker producing candidate file records.
//!
//! # Overview
//!
//! This module provides the [`FileScanner`] struct for traversing a
//! directory tree and collecting [`FileRecord`]s for duplicate detection.
//! Traversal is single-threaded via [`walkdir`]; the pipeline downstream
//! of the scanner is strictly sequential.
//!
//! # Behavior
//!
//! - A directory literally named `.git` is pruned entirely
//! - Paths matching the root's ignore rules are skipped
//! - Files strictly smaller than the minimum size are skipped
//! - Symbolic links are not followed and never yield records
//! - Any directory-read failure aborts the scan; partial results are
//!   discarded
//!
//! Traversal order is filesystem-walk order and is not guaranteed to be
//! sorted; callers must not depend on it.
//!
//! # Example
//!
//! ```no_run
//! use redup::scanner::FileScanner;
//! use std::path::Path;
//!
//! let scanner = FileScanner::new(0);
//! match scanner.scan(Path::new("/home/user/Downloads")) {
//!     Ok(records) => println!("Found {} files", records.len()),
//!     Err(e) => eprintln!("Scan failed: {}", e),
//! }
//! ```

use std::io;
use std::path::Path;
use std::time::SystemTime;

use walkdir::WalkDir;

use super::{FileRecord, IgnoreRuleSet, ScanError};

/// Directory name pruned from every scan regardless of ignore rules.
const GIT_DIR_NAME: &str = ".git";

/// Directory scanner for sequential file discovery.
#[derive(Debug, Clone)]
pub struct FileScanner {
    /// Minimum file size in bytes; files strictly smaller are skipped
    /// when this is greater than zero.
    min_size: u64,
}

impl FileScanner {
    /// Create a new scanner with the given minimum file size.
    #[must_use]
    pub fn new(min_size: u64) -> Self {
        Self { min_size }
    }

    /// Walk `root` and return a record for every regular file that passes
    /// the ignore rules and size filter.
    ///
    /// The ignore rule file is loaded from `root` before walking; its
    /// absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ScanError` if the root does not exist or is not a
    /// directory, if the rule file exists but cannot be read, or if any
    /// directory read or metadata lookup fails. A failed scan returns no
    /// partial results.
    pub fn scan(&self, root: &Path) -> Result<Vec<FileRecord>, ScanError> {
        if !root.exists() {
            return Err(ScanError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let rules = IgnoreRuleSet::load(root).map_err(|source| ScanError::Io {
            path: root.join(super::ignore::IGNORE_FILE_NAME),
            source,
        })?;

        log::info!("Scanning {}", root.display());

        let mut records = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                if entry.file_type().is_dir() && entry.file_name() == GIT_DIR_NAME {
                    log::debug!("Pruning {}", entry.path().display());
                    false
                } else {
                    true
                }
            });

        for entry in walker {
            let entry = entry.map_err(|e| walkdir_error(root, e))?;

            // Only regular files become records; symlinks are left alone.
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            if rules.should_ignore(path, root) {
                log::trace!("Ignoring file: {}", path.display());
                continue;
            }

            let metadata = entry.metadata().map_err(|e| walkdir_error(root, e))?;

            let size = metadata.len();
            if self.min_size > 0 && size < self.min_size {
                log::trace!(
                    "Skipping file due to size filter ({}): {}",
                    size,
                    path.display()
                );
                continue;
            }

            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

            records.push(FileRecord {
                path: path.to_path_buf(),
                size,
                modified,
            });
        }

        log::info!("Found {} candidate file(s)", records.len());

        Ok(records)
    }
}

/// Convert a walkdir error into a ScanError with the best available path.
fn walkdir_error(root: &Path, error: walkdir::Error) -> ScanError {
    let path = error
        .path()
        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);

    match error.io_error().map(io::Error::kind) {
        Some(io::ErrorKind::PermissionDenied) => {
            log::warn!("Permission denied: {}", path.display());
            ScanError::PermissionDenied(path)
        }
        Some(io::ErrorKind::NotFound) => ScanError::NotFound(path),
        _ => ScanError::Io {
            path,
            source: error
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("walk error")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    /// Create a test directory with some files.
    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        let mut f = File::create(dir.path().join("file1.txt")).unwrap();
        writeln!(f, "Hello, world!").unwrap();

        let mut f = File::create(dir.path().join("file2.txt")).unwrap();
        writeln!(f, "Another file").unwrap();

        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        let mut f = File::create(subdir.join("nested.txt")).unwrap();
        writeln!(f, "Nested file content").unwrap();

        dir
    }

    #[test]
    fn test_scanner_finds_files() {
        let dir = create_test_dir();
        let scanner = FileScanner::new(0);

        let records = scanner.scan(dir.path()).unwrap();

        assert_eq!(records.len(), 3);
        for record in &records {
            assert!(record.size > 0);
            assert!(record.path.exists());
        }
    }

    #[test]
    fn test_scanner_min_size_filter() {
        let dir = create_test_dir();

        let mut f = File::create(dir.path().join("tiny.txt")).unwrap();
        f.write_all(b"X").unwrap();

        let scanner = FileScanner::new(10);
        let records = scanner.scan(dir.path()).unwrap();

        for record in &records {
            assert!(
                record.size >= 10,
                "File {} has size {}",
                record.path.display(),
                record.size
            );
        }
    }

    #[test]
    fn test_scanner_zero_min_size_keeps_small_files() {
        let dir = TempDir::new().unwrap();
        let mut f = File::create(dir.path().join("tiny.txt")).unwrap();
        f.write_all(b"X").unwrap();

        let scanner = FileScanner::new(0);
        let records = scanner.scan(dir.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size, 1);
    }

    #[test]
    fn test_scanner_prunes_git_dir() {
        let dir = create_test_dir();

        let git = dir.path().join("subdir").join(".git");
        fs::create_dir_all(git.join("objects")).unwrap();
        let mut f = File::create(git.join("objects").join("pack")).unwrap();
        writeln!(f, "object data").unwrap();
        let mut f = File::create(git.join("HEAD")).unwrap();
        writeln!(f, "ref: refs/heads/main").unwrap();

        let scanner = FileScanner::new(0);
        let records = scanner.scan(dir.path()).unwrap();

        assert_eq!(records.len(), 3);
        for record in &records {
            assert!(
                !record.path.components().any(|c| c.as_os_str() == ".git"),
                "Record from inside .git: {}",
                record.path.display()
            );
        }
    }

    #[test]
    fn test_scanner_applies_ignore_rules() {
        let dir = create_test_dir();

        let mut f = File::create(dir.path().join(".gitignore")).unwrap();
        writeln!(f, "*.log").unwrap();
        writeln!(f, "subdir/").unwrap();

        let mut f = File::create(dir.path().join("debug.log")).unwrap();
        writeln!(f, "log content").unwrap();

        let scanner = FileScanner::new(0);
        let records = scanner.scan(dir.path()).unwrap();

        let names: Vec<_> = records
            .iter()
            .map(|r| r.path.file_name().unwrap().to_str().unwrap().to_owned())
            .collect();

        assert!(!names.contains(&"debug.log".to_string()));
        assert!(!names.contains(&"nested.txt".to_string()));
        assert!(names.contains(&"file1.txt".to_string()));
        // The rule file itself is a candidate unless a rule excludes it.
        assert!(names.contains(&".gitignore".to_string()));
    }

    #[test]
    fn test_scanner_missing_root() {
        let scanner = FileScanner::new(0);
        let err = scanner
            .scan(Path::new("/nonexistent/path/12345"))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound(_)));
    }

    #[test]
    fn test_scanner_root_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        File::create(&file).unwrap().write_all(b"x").unwrap();

        let scanner = FileScanner::new(0);
        let err = scanner.scan(&file).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[test]
    #[cfg(unix)]
    fn test_scanner_skips_symlinks() {
        use std::os::unix::fs::symlink;

        let dir = create_test_dir();
        symlink(dir.path().join("file1.txt"), dir.path().join("link.txt")).unwrap();

        let scanner = FileScanner::new(0);
        let records = scanner.scan(dir.path()).unwrap();

        assert_eq!(records.len(), 3);
        assert!(records
            .iter()
            .all(|r| r.path.file_name().unwrap() != "link.txt"));
    }

    #[test]
    fn test_record_fields_populated() {
        let dir = create_test_dir();
        let scanner = FileScanner::new(0);

        let records = scanner.scan(dir.path()).unwrap();
        let record = records.first().unwrap();

        assert!(!record.path.as_os_str().is_empty());
        assert!(record.size > 0);
        assert!(record.modified != SystemTime::UNIX_EPOCH);
    }
}
