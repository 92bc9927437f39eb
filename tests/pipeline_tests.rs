//! End-to-end scan-and-group scenarios.

use redup::duplicates::{filter_duplicates, total_reclaimable_size, ContentGrouper};
use redup::scanner::{FileScanner, HashAlgorithm};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_file(dir: &Path, name: &str, content: &[u8]) {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(content).unwrap();
}

fn scan_and_group(root: &Path, min_size: u64) -> Vec<redup::duplicates::FileGroup> {
    let records = FileScanner::new(min_size).scan(root).unwrap();
    let groups = ContentGrouper::new(HashAlgorithm::Sha256)
        .group(records)
        .unwrap();
    filter_duplicates(groups)
}

#[test]
fn test_three_duplicates_one_unique() {
    let dir = tempdir().unwrap();

    write_file(dir.path(), "file1.txt", b"duplicate content");
    write_file(dir.path(), "file2.txt", b"duplicate content");
    write_file(dir.path(), "file3.txt", b"duplicate content");
    write_file(dir.path(), "file4.txt", b"unique content");

    let duplicates = scan_and_group(dir.path(), 0);

    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].files.len(), 3);
    assert_eq!(
        total_reclaimable_size(&duplicates),
        2 * "duplicate content".len() as u64
    );
}

#[test]
fn test_no_duplicates_in_unique_tree() {
    let dir = tempdir().unwrap();

    write_file(dir.path(), "a.txt", b"content a");
    write_file(dir.path(), "b.txt", b"content b");
    write_file(dir.path(), "c.txt", b"content c");

    let duplicates = scan_and_group(dir.path(), 0);

    assert!(duplicates.is_empty());
}

#[test]
fn test_duplicates_across_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("deep").join("nested");
    fs::create_dir_all(&sub).unwrap();

    write_file(dir.path(), "top.dat", b"mirrored bytes");
    write_file(&sub, "bottom.dat", b"mirrored bytes");

    let duplicates = scan_and_group(dir.path(), 0);

    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].files.len(), 2);
}

#[test]
fn test_git_directory_contents_never_scanned() {
    let dir = tempdir().unwrap();

    write_file(dir.path(), "kept.txt", b"duplicate content");
    write_file(dir.path(), "kept2.txt", b"duplicate content");

    // Duplicates inside .git must not surface, no matter the depth.
    let git = dir.path().join("sub").join(".git");
    fs::create_dir_all(git.join("objects")).unwrap();
    write_file(&git, "config.txt", b"duplicate content");
    write_file(&git.join("objects"), "pack.txt", b"duplicate content");

    let records = FileScanner::new(0).scan(dir.path()).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| !r.path.components().any(|c| c.as_os_str() == ".git")));
}

#[test]
fn test_ignore_rules_shape_the_scan() {
    let dir = tempdir().unwrap();

    let mut f = File::create(dir.path().join(".gitignore")).unwrap();
    writeln!(f, "*.log").unwrap();
    writeln!(f, "build/").unwrap();
    drop(f);

    let a = dir.path().join("a");
    fs::create_dir(&a).unwrap();
    write_file(&a, "app.log", b"duplicate content");
    write_file(&a, "app.logx", b"duplicate content");

    let build = dir.path().join("build");
    fs::create_dir(&build).unwrap();
    write_file(&build, "out.txt", b"duplicate content");

    write_file(dir.path(), "main.txt", b"duplicate content");

    let records = FileScanner::new(0).scan(dir.path()).unwrap();
    let names: Vec<_> = records
        .iter()
        .map(|r| r.path.file_name().unwrap().to_str().unwrap().to_owned())
        .collect();

    // `*.log` excludes app.log but not app.logx; `build/` excludes the tree.
    assert!(!names.contains(&"app.log".to_string()));
    assert!(names.contains(&"app.logx".to_string()));
    assert!(!names.contains(&"out.txt".to_string()));
    assert!(names.contains(&"main.txt".to_string()));
}

#[test]
fn test_min_size_filter_end_to_end() {
    let dir = tempdir().unwrap();

    write_file(dir.path(), "big1.bin", b"0123456789abcdef");
    write_file(dir.path(), "big2.bin", b"0123456789abcdef");
    write_file(dir.path(), "small1.bin", b"tiny");
    write_file(dir.path(), "small2.bin", b"tiny");

    let duplicates = scan_and_group(dir.path(), 10);

    assert_eq!(duplicates.len(), 1);
    assert!(duplicates[0].files.iter().all(|f| f.size >= 10));
}

#[test]
fn test_canonical_selection_demotes_copy_on_mtime_tie() {
    let dir = tempdir().unwrap();

    write_file(dir.path(), "report.txt", b"duplicate content");
    write_file(dir.path(), "report - Copy.txt", b"duplicate content");

    let mtime = filetime::FileTime::from_unix_time(1_700_000_000, 0);
    filetime::set_file_mtime(dir.path().join("report.txt"), mtime).unwrap();
    filetime::set_file_mtime(dir.path().join("report - Copy.txt"), mtime).unwrap();

    let duplicates = scan_and_group(dir.path(), 0);

    assert_eq!(duplicates.len(), 1);
    assert_eq!(
        duplicates[0].files[0].path.file_name().unwrap(),
        "report.txt"
    );
}

#[test]
fn test_older_file_is_canonical() {
    let dir = tempdir().unwrap();

    write_file(dir.path(), "newer.txt", b"duplicate content");
    write_file(dir.path(), "older.txt", b"duplicate content");

    filetime::set_file_mtime(
        dir.path().join("older.txt"),
        filetime::FileTime::from_unix_time(1_500_000_000, 0),
    )
    .unwrap();
    filetime::set_file_mtime(
        dir.path().join("newer.txt"),
        filetime::FileTime::from_unix_time(1_700_000_000, 0),
    )
    .unwrap();

    let duplicates = scan_and_group(dir.path(), 0);

    assert_eq!(duplicates.len(), 1);
    assert_eq!(
        duplicates[0].files[0].path.file_name().unwrap(),
        "older.txt"
    );
}

#[test]
fn test_md5_pipeline_finds_same_duplicates() {
    let dir = tempdir().unwrap();

    write_file(dir.path(), "x.bin", b"payload bytes");
    write_file(dir.path(), "y.bin", b"payload bytes");

    let records = FileScanner::new(0).scan(dir.path()).unwrap();
    let duplicates = filter_duplicates(
        ContentGrouper::new(HashAlgorithm::Md5)
            .group(records)
            .unwrap(),
    );

    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].checksum.len(), 32); // md5 hex width
}

#[test]
fn test_scan_failure_discards_everything() {
    let missing = Path::new("/definitely/not/here/12345");
    assert!(FileScanner::new(0).scan(missing).is_err());
}
