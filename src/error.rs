//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the redup application.
///
/// - 0: Success (completed normally)
/// - 1: General error (fatal failure, run aborted)
/// - 2: No duplicates found (completed normally, nothing to do)
/// - 3: Partial success (completed with some per-item failures)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the run completed and all actions succeeded.
    Success = 0,
    /// General error: a fatal error aborted the run.
    GeneralError = 1,
    /// No duplicates: the scan completed but found nothing to do.
    NoDuplicates = 2,
    /// Partial success: completed with some non-fatal per-item errors.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "RD000",
            Self::GeneralError => "RD001",
            Self::NoDuplicates => "RD002",
            Self::PartialSuccess => "RD003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "RD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
