use dupsweep_scan::{DirectoryScanner, ExtensionFilter, ScanConfig, ScanError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_root_is_not_found() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("does-not-exist");

    let result = DirectoryScanner::new().scan(&ScanConfig::new(&missing));

    assert!(matches!(result, Err(ScanError::NotFound { .. })));
}

#[test]
fn test_file_root_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain.txt");
    fs::write(&file, "x").unwrap();

    let result = DirectoryScanner::new().scan(&ScanConfig::new(&file));

    assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
}

#[test]
fn test_empty_root_yields_nothing() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("empty")).unwrap();

    let files = DirectoryScanner::new()
        .scan(&ScanConfig::new(temp.path()))
        .unwrap();

    assert!(files.is_empty());
}

#[test]
fn test_traversal_order_is_repeatable() {
    let temp = TempDir::new().unwrap();
    for name in ["c.txt", "a.txt", "b.txt"] {
        fs::write(temp.path().join(name), name).unwrap();
    }
    fs::create_dir(temp.path().join("sub")).unwrap();
    fs::write(temp.path().join("sub/z.txt"), "z").unwrap();

    let scanner = DirectoryScanner::new();
    let first = scanner.scan(&ScanConfig::new(temp.path())).unwrap();
    let second = scanner.scan(&ScanConfig::new(temp.path())).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_files_without_extension_skipped_by_filter() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("Makefile"), "all:").unwrap();
    fs::write(temp.path().join("main.rs"), "fn main() {}").unwrap();

    let config = ScanConfig::new(temp.path()).with_filter(ExtensionFilter::parse(".RS"));
    let files = DirectoryScanner::new().scan(&config).unwrap();

    assert_eq!(files.len(), 1);
    assert!(files[0].path.ends_with("main.rs"));
}

#[test]
fn test_progress_reports_final_update() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("one.txt"), "1").unwrap();
    fs::write(temp.path().join("two.txt"), "22").unwrap();

    let scanner = DirectoryScanner::new();
    let mut rx = scanner.subscribe();
    scanner.scan(&ScanConfig::new(temp.path())).unwrap();

    let progress = rx.try_recv().unwrap();
    assert!(progress.finished);
    assert_eq!(progress.files_found, 2);
    assert_eq!(progress.bytes_found, 3);
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_aborts_scan() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("visible.txt"), "v").unwrap();
    let locked = temp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden.txt"), "h").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not bind root; nothing to check there.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = DirectoryScanner::new().scan(&ScanConfig::new(temp.path()));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    match result {
        Err(ScanError::PermissionDenied { path }) => assert!(path.ends_with("locked")),
        other => panic!("expected permission error, got {other:?}"),
    }
}

#[test]
fn test_max_depth_limits_walk() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("top.txt"), "t").unwrap();
    fs::create_dir(temp.path().join("deep")).unwrap();
    fs::write(temp.path().join("deep/inner.txt"), "i").unwrap();

    let mut config = ScanConfig::new(temp.path());
    config.max_depth = Some(1);
    let files = DirectoryScanner::new().scan(&config).unwrap();

    assert_eq!(files.len(), 1);
    assert!(files[0].path.ends_with("top.txt"));
}
