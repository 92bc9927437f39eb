//! Round-trip scenarios: back up a duplicate group, then revert it.

use redup::backup::{BackupManager, RevertEngine, RevertError, RevertOptions};
use redup::confirm::{AutoConfirm, Scripted};
use redup::duplicates::{filter_duplicates, ContentGrouper, FileGroup};
use redup::scanner::{FileScanner, HashAlgorithm};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

fn find_duplicates(root: &Path) -> Vec<FileGroup> {
    let records = FileScanner::new(0).scan(root).unwrap();
    filter_duplicates(
        ContentGrouper::new(HashAlgorithm::Sha256)
            .group(records)
            .unwrap(),
    )
}

#[test]
fn test_backup_then_revert_round_trip() {
    let tree = tempdir().unwrap();
    let base = tempdir().unwrap();
    let logs = tempdir().unwrap();

    let sub = tree.path().join("nested");
    fs::create_dir(&sub).unwrap();
    let a = write_file(tree.path(), "a.txt", b"duplicate content");
    let b = write_file(tree.path(), "b.txt", b"duplicate content");
    let c = write_file(&sub, "c.txt", b"duplicate content");

    // Pin mtimes so `a` is the canonical candidate.
    filetime::set_file_mtime(&a, filetime::FileTime::from_unix_time(1_000_000, 0)).unwrap();
    filetime::set_file_mtime(&b, filetime::FileTime::from_unix_time(2_000_000, 0)).unwrap();
    filetime::set_file_mtime(&c, filetime::FileTime::from_unix_time(3_000_000, 0)).unwrap();

    let duplicates = find_duplicates(tree.path());
    assert_eq!(duplicates.len(), 1);

    let mut policy = AutoConfirm;
    let report = BackupManager::new(base.path(), logs.path(), &mut policy)
        .process(&duplicates)
        .unwrap();

    assert_eq!(report.moved, 2);
    assert!(report.all_succeeded());
    assert!(a.exists());
    assert!(!b.exists());
    assert!(!c.exists());
    assert!(report.log_path.exists());

    // Revert everything.
    let options = RevertOptions {
        log_path: Some(report.log_path.clone()),
        log_dir: logs.path().to_path_buf(),
        dry_run: false,
    };
    let summary = RevertEngine::new(&mut policy).revert(&options).unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.errors, 0);

    // Every moved file is back at its original path.
    assert!(a.exists());
    assert!(b.exists());
    assert!(c.exists());
    assert_eq!(fs::read(&b).unwrap(), b"duplicate content");

    // The log is deleted and the emptied backup root removed.
    assert!(summary.log_deleted);
    assert!(!report.log_path.exists());
    assert!(summary.backup_root_removed);
    assert!(!report.backup_root.exists());
}

#[test]
fn test_dry_run_revert_performs_zero_mutations() {
    let tree = tempdir().unwrap();
    let base = tempdir().unwrap();
    let logs = tempdir().unwrap();

    let a = write_file(tree.path(), "a.txt", b"same");
    let b = write_file(tree.path(), "b.txt", b"same");
    filetime::set_file_mtime(&a, filetime::FileTime::from_unix_time(1_000_000, 0)).unwrap();
    filetime::set_file_mtime(&b, filetime::FileTime::from_unix_time(2_000_000, 0)).unwrap();

    let mut policy = AutoConfirm;
    let report = BackupManager::new(base.path(), logs.path(), &mut policy)
        .process(&find_duplicates(tree.path()))
        .unwrap();
    assert_eq!(report.moved, 1);

    let options = RevertOptions {
        log_path: Some(report.log_path.clone()),
        log_dir: logs.path().to_path_buf(),
        dry_run: true,
    };
    let summary = RevertEngine::new(&mut policy).revert(&options).unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.errors, 0);

    // Nothing on disk changed: file still in backup, log still present.
    assert!(!b.exists());
    assert!(report.log_path.exists());
    assert!(report.backup_root.exists());
    assert!(!summary.log_deleted);

    // A real revert afterwards still works from the same log.
    let options = RevertOptions {
        dry_run: false,
        ..options
    };
    let summary = RevertEngine::new(&mut policy).revert(&options).unwrap();
    assert_eq!(summary.succeeded, 1);
    assert!(b.exists());
}

#[test]
fn test_interactive_keep_choice_round_trips() {
    let tree = tempdir().unwrap();
    let base = tempdir().unwrap();
    let logs = tempdir().unwrap();

    let a = write_file(tree.path(), "a.txt", b"same bytes");
    let b = write_file(tree.path(), "b.txt", b"same bytes");
    filetime::set_file_mtime(&a, filetime::FileTime::from_unix_time(1_000_000, 0)).unwrap();
    filetime::set_file_mtime(&b, filetime::FileTime::from_unix_time(2_000_000, 0)).unwrap();

    // Keep index 1 (file b), confirm the single move.
    let mut policy = Scripted::new([true], [Some(1)]);
    let report = BackupManager::new(base.path(), logs.path(), &mut policy)
        .process(&find_duplicates(tree.path()))
        .unwrap();

    assert_eq!(report.moved, 1);
    assert!(!a.exists());
    assert!(b.exists());

    let mut auto = AutoConfirm;
    let options = RevertOptions {
        log_path: Some(report.log_path.clone()),
        log_dir: logs.path().to_path_buf(),
        dry_run: false,
    };
    RevertEngine::new(&mut auto).revert(&options).unwrap();

    assert!(a.exists());
    assert!(b.exists());
}

#[test]
fn test_cancelled_group_then_no_log_to_revert() {
    let tree = tempdir().unwrap();
    let base = tempdir().unwrap();
    let logs = tempdir().unwrap();

    write_file(tree.path(), "a.txt", b"same");
    write_file(tree.path(), "b.txt", b"same");

    let mut policy = Scripted::new([], [None]);
    let report = BackupManager::new(base.path(), logs.path(), &mut policy)
        .process(&find_duplicates(tree.path()))
        .unwrap();

    assert_eq!(report.skipped_groups, 1);
    assert_eq!(report.moved, 0);
    assert!(!report.log_path.exists());

    // Nothing was journaled, so revert has nothing to find.
    let mut auto = AutoConfirm;
    let options = RevertOptions {
        log_path: None,
        log_dir: logs.path().to_path_buf(),
        dry_run: false,
    };
    let err = RevertEngine::new(&mut auto).revert(&options).unwrap_err();
    assert!(matches!(err, RevertError::NoLogs(_)));
}

#[test]
fn test_multiple_groups_share_one_session_log() {
    let tree = tempdir().unwrap();
    let base = tempdir().unwrap();
    let logs = tempdir().unwrap();

    write_file(tree.path(), "g1a.txt", b"first group");
    write_file(tree.path(), "g1b.txt", b"first group");
    write_file(tree.path(), "g2a.txt", b"second group!");
    write_file(tree.path(), "g2b.txt", b"second group!");
    write_file(tree.path(), "g2c.txt", b"second group!");

    let duplicates = find_duplicates(tree.path());
    assert_eq!(duplicates.len(), 2);

    let mut policy = AutoConfirm;
    let report = BackupManager::new(base.path(), logs.path(), &mut policy)
        .process(&duplicates)
        .unwrap();

    assert_eq!(report.moved, 3);

    let content = fs::read_to_string(&report.log_path).unwrap();
    // One header plus one row per move.
    assert_eq!(content.lines().count(), 4);
    assert_eq!(
        content
            .lines()
            .filter(|l| l.starts_with("kept_path,"))
            .count(),
        1
    );

    let options = RevertOptions {
        log_path: None,
        log_dir: logs.path().to_path_buf(),
        dry_run: false,
    };
    let summary = RevertEngine::new(&mut policy).revert(&options).unwrap();
    assert_eq!(summary.succeeded, 3);
    assert!(tree.path().join("g1b.txt").exists());
    assert!(tree.path().join("g2b.txt").exists());
    assert!(tree.path().join("g2c.txt").exists());
}

#[test]
fn test_revert_skips_rows_with_missing_backup_files() {
    let tree = tempdir().unwrap();
    let base = tempdir().unwrap();
    let logs = tempdir().unwrap();

    write_file(tree.path(), "a.txt", b"same content");
    write_file(tree.path(), "b.txt", b"same content");
    write_file(tree.path(), "c.txt", b"same content");

    let mut policy = AutoConfirm;
    let report = BackupManager::new(base.path(), logs.path(), &mut policy)
        .process(&find_duplicates(tree.path()))
        .unwrap();
    assert_eq!(report.moved, 2);

    // Sabotage one journaled backup file.
    let content = fs::read_to_string(&report.log_path).unwrap();
    let first_backup = content
        .lines()
        .nth(1)
        .unwrap()
        .split(',')
        .nth(2)
        .unwrap()
        .to_string();
    fs::remove_file(&first_backup).unwrap();

    let options = RevertOptions {
        log_path: Some(report.log_path.clone()),
        log_dir: logs.path().to_path_buf(),
        dry_run: false,
    };
    let summary = RevertEngine::new(&mut policy).revert(&options).unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.errors, 1);
    // Errors occurred: log must be kept for inspection.
    assert!(report.log_path.exists());
    assert!(!summary.log_deleted);
}
