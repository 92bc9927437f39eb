//! Human-readable summaries for scan and revert results.

use std::io;

use bytesize::ByteSize;

use crate::backup::{BackupReport, RevertSummary, RowOutcome};
use crate::duplicates::{total_reclaimable_size, FileGroup};

/// Print a summary of the duplicate groups found by a scan.
///
/// Each group lists its canonical candidate first, followed by the
/// copies that would be relocated by a backup run.
///
/// # Errors
///
/// Returns an I/O error if the writer fails.
pub fn print_scan_summary<W: io::Write>(groups: &[FileGroup], mut w: W) -> io::Result<()> {
    if groups.is_empty() {
        writeln!(w, "No duplicate files found.")?;
        return Ok(());
    }

    let total_copies: usize = groups.iter().map(FileGroup::duplicate_count).sum();
    writeln!(w, "Found {total_copies} duplicate file(s):")?;
    writeln!(w)?;

    for (i, group) in groups.iter().enumerate() {
        writeln!(w, "[{}] {}", i + 1, group.files[0].path.display())?;
        writeln!(w, "Found {} copies:", group.duplicate_count())?;
        for file in &group.files[1..] {
            writeln!(w, "  {}", file.path.display())?;
        }
        writeln!(w)?;
    }

    writeln!(
        w,
        "Total space that can be freed: {}",
        ByteSize::b(total_reclaimable_size(groups))
    )?;

    Ok(())
}

/// Print the outcome of a backup run.
///
/// # Errors
///
/// Returns an I/O error if the writer fails.
pub fn print_backup_report<W: io::Write>(report: &BackupReport, mut w: W) -> io::Result<()> {
    if report.attempted == 0 && report.skipped_groups == 0 {
        return Ok(());
    }

    writeln!(w, "{}", report.summary())?;
    if report.moved > 0 {
        writeln!(w, "Backup directory: {}", report.backup_root.display())?;
        writeln!(w, "Session log: {}", report.log_path.display())?;
    }
    if report.skipped_groups > 0 {
        writeln!(w, "Skipped {} group(s).", report.skipped_groups)?;
    }
    Ok(())
}

/// Print the per-row results and totals of a revert run.
///
/// # Errors
///
/// Returns an I/O error if the writer fails.
pub fn print_revert_summary<W: io::Write>(summary: &RevertSummary, mut w: W) -> io::Result<()> {
    if summary.cancelled {
        writeln!(w, "Revert cancelled.")?;
        return Ok(());
    }

    for row in &summary.rows {
        match &row.outcome {
            RowOutcome::Planned => writeln!(
                w,
                "[dry-run] Would revert: {} -> {}",
                row.backup_path.display(),
                row.restored_path.display()
            )?,
            RowOutcome::Reverted => writeln!(
                w,
                "Reverted: {} -> {}",
                row.backup_path.display(),
                row.restored_path.display()
            )?,
            RowOutcome::Invalid => writeln!(w, "Warning: invalid record at line {}", row.line)?,
            RowOutcome::MissingBackup => writeln!(
                w,
                "Error: backup file not found: {}",
                row.backup_path.display()
            )?,
            RowOutcome::IoError(message) => writeln!(
                w,
                "Error reverting {}: {}",
                row.backup_path.display(),
                message
            )?,
        }
    }

    writeln!(w)?;
    writeln!(
        w,
        "Revert completed: {} successful, {} errors",
        summary.succeeded, summary.errors
    )?;

    if summary.log_deleted {
        writeln!(w, "Removed log file: {}", summary.log_path.display())?;
    }

    Ok(())
}
