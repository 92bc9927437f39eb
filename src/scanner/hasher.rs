//! Streaming file checksums over a closed set of hash algorithms.
//!
//! # Overview
//!
//! This module provides [`HashAlgorithm`], the closed set of content-hash
//! algorithms used to group files. The algorithm is selected once, at
//! construction (CLI parse) time; unknown identifiers are rejected there
//! rather than at use time.
//!
//! Hashing streams the file through the digest in fixed-size chunks, so
//! memory use is constant regardless of file size.
//!
//! # Example
//!
//! ```no_run
//! use redup::scanner::HashAlgorithm;
//! use std::path::Path;
//!
//! let algorithm = HashAlgorithm::parse("sha256").unwrap();
//! let checksum = algorithm.checksum_file(Path::new("/tmp/file.bin")).unwrap();
//! println!("{checksum}");
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use md5::Md5;
use sha2::{Digest, Sha256};

/// Read buffer size for streaming hashes.
const CHUNK_SIZE: usize = 64 * 1024;

/// Errors that can occur while checksumming files.
///
/// A checksum error is fatal to the grouping pass that triggered it.
#[derive(thiserror::Error, Debug)]
pub enum ChecksumError {
    /// The requested algorithm identifier is not supported.
    #[error("Unsupported checksum algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The file to hash was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ChecksumError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// The closed set of supported content-hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// SHA-256 (default)
    #[default]
    Sha256,
    /// MD5 (faster, collision risk accepted for grouping)
    Md5,
}

impl HashAlgorithm {
    /// Parse an algorithm identifier.
    ///
    /// # Errors
    ///
    /// Returns `ChecksumError::UnknownAlgorithm` for any identifier other
    /// than `sha256` or `md5`. This is the only place identifiers are
    /// checked; a constructed `HashAlgorithm` is always usable.
    pub fn parse(name: &str) -> Result<Self, ChecksumError> {
        match name.to_ascii_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "md5" => Ok(Self::Md5),
            other => Err(ChecksumError::UnknownAlgorithm(other.to_string())),
        }
    }

    /// Canonical name of the algorithm.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Md5 => "md5",
        }
    }

    /// Compute the hex checksum of a file's content.
    ///
    /// The file is streamed through the digest in [`CHUNK_SIZE`] chunks;
    /// no full in-memory buffering occurs.
    ///
    /// # Errors
    ///
    /// Returns `ChecksumError` if the file cannot be opened or becomes
    /// unreadable mid-hash.
    pub fn checksum_file(self, path: &Path) -> Result<String, ChecksumError> {
        match self {
            Self::Sha256 => stream_digest::<Sha256>(path),
            Self::Md5 => stream_digest::<Md5>(path),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Stream a file through digest `D` and return the lowercase hex result.
fn stream_digest<D: Digest>(path: &Path) -> Result<String, ChecksumError> {
    let mut file = File::open(path).map_err(|e| ChecksumError::from_io(path, e))?;
    let mut hasher = D::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|e| ChecksumError::from_io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hash_to_hex(hasher.finalize().as_slice()))
}

/// Encode digest bytes as a lowercase hex string.
#[must_use]
pub fn hash_to_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}
