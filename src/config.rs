//! Per-run settings: the explicit session object threaded through the
//! pipeline.
//!
//! A [`Settings`] value is constructed once per invocation from the CLI
//! (or the interactive menu) and passed to every component that needs
//! it. Nothing in the pipeline reads configuration from ambient state.

use std::path::PathBuf;

use crate::confirm::{AutoConfirm, ConfirmPolicy, TerminalPrompt};
use crate::scanner::HashAlgorithm;

/// Settings for one scan-and-backup run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory tree to scan
    pub root: PathBuf,
    /// Content-hash algorithm for grouping
    pub algorithm: HashAlgorithm,
    /// Minimum file size in bytes (0 disables the filter)
    pub min_size: u64,
    /// Base directory the timestamped backup root is created under
    pub backup_dir: PathBuf,
    /// Directory the session log is written to
    pub log_dir: PathBuf,
    /// Report duplicates without performing any backup
    pub dry_run: bool,
    /// Answer yes everywhere and keep the canonical candidate
    pub auto_confirm: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            algorithm: HashAlgorithm::Sha256,
            min_size: 0,
            backup_dir: PathBuf::from("."),
            log_dir: PathBuf::from("."),
            dry_run: false,
            auto_confirm: false,
        }
    }
}

impl Settings {
    /// The confirmation policy implied by these settings.
    #[must_use]
    pub fn policy(&self) -> Box<dyn ConfirmPolicy> {
        if self.auto_confirm {
            Box::new(AutoConfirm)
        } else {
            Box::new(TerminalPrompt)
        }
    }
}
