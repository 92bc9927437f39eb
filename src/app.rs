//! Application wiring: turn parsed CLI arguments into pipeline runs.

use std::io;

use anyhow::{Context, Result};

use crate::backup::{BackupManager, RevertEngine, RevertOptions};
use crate::cli::{Cli, Commands, OutputFormat, RevertArgs, ScanArgs};
use crate::config::Settings;
use crate::confirm::{AutoConfirm, ConfirmPolicy, TerminalPrompt};
use crate::duplicates::{filter_duplicates, ContentGrouper};
use crate::error::ExitCode;
use crate::menu::Menu;
use crate::output::{summary, CsvReport, JsonReport};
use crate::scanner::FileScanner;

/// Run the application and return the process exit code.
///
/// # Errors
///
/// Returns an error for any fatal failure: scan errors, checksum
/// errors, an uncreatable backup directory, or an unusable session log.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    crate::logging::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Scan(args)) => run_scan(&args),
        Some(Commands::Revert(args)) => run_revert(&args),
        None => {
            Menu::new(Settings::default()).run();
            Ok(ExitCode::Success)
        }
    }
}

/// Scan, group, report, and (unless dry-run) back up duplicates.
fn run_scan(args: &ScanArgs) -> Result<ExitCode> {
    let settings = Settings {
        root: args.path.clone(),
        algorithm: args.checksum.into(),
        min_size: args.min_size,
        backup_dir: args.backup_dir.clone(),
        dry_run: args.dry_run,
        auto_confirm: args.yes,
        ..Settings::default()
    };

    let scanner = FileScanner::new(settings.min_size);
    let records = scanner
        .scan(&settings.root)
        .with_context(|| format!("failed to scan {}", settings.root.display()))?;

    let grouper = ContentGrouper::new(settings.algorithm);
    let groups = grouper
        .group(records)
        .context("failed to group files by checksum")?;

    let duplicates = filter_duplicates(groups);

    let stdout = io::stdout();
    match args.output {
        OutputFormat::Summary => summary::print_scan_summary(&duplicates, stdout.lock())?,
        OutputFormat::Json => JsonReport::new(&duplicates).write_to(stdout.lock())?,
        OutputFormat::Csv => CsvReport::new(&duplicates).write_to(stdout.lock())?,
    }

    if duplicates.is_empty() {
        return Ok(ExitCode::NoDuplicates);
    }

    if settings.dry_run {
        return Ok(ExitCode::Success);
    }

    let mut policy = settings.policy();
    let mut manager =
        BackupManager::new(&settings.backup_dir, &settings.log_dir, policy.as_mut());
    let report = manager
        .process(&duplicates)
        .context("failed to start backup session")?;

    summary::print_backup_report(&report, io::stdout().lock())?;

    if report.all_succeeded() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::PartialSuccess)
    }
}

/// Replay a session log in reverse.
fn run_revert(args: &RevertArgs) -> Result<ExitCode> {
    let options = RevertOptions {
        log_path: args.log.clone(),
        dry_run: args.dry_run,
        ..RevertOptions::default()
    };

    let mut auto = AutoConfirm;
    let mut terminal = TerminalPrompt;
    let policy: &mut dyn ConfirmPolicy = if args.yes { &mut auto } else { &mut terminal };

    let summary_result = RevertEngine::new(policy)
        .revert(&options)
        .context("revert failed")?;

    summary::print_revert_summary(&summary_result, io::stdout().lock())?;

    if summary_result.errors > 0 {
        Ok(ExitCode::PartialSuccess)
    } else {
        Ok(ExitCode::Success)
    }
}
