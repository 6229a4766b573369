use dupsweep_core::{
    total_pages, ContentHash, ContentKey, DeletionRecord, ExtensionFilter, FileRecord,
    LargeFileEntry, PaginatedResultSet, ScanConfig,
};
use std::path::{Path, PathBuf};

#[test]
fn test_total_pages_properties() {
    for page_size in 1..=7 {
        assert_eq!(total_pages(0, page_size), 1);
        for n in 1..=50 {
            assert_eq!(total_pages(n, page_size), n.div_ceil(page_size));
        }
    }
}

#[test]
fn test_page_index_stays_in_range_while_shrinking() {
    let mut set = PaginatedResultSet::new((0..40).collect::<Vec<u32>>(), 6);

    for _ in 0..40 {
        set.last_page();
        let last = *set.page_items().last().unwrap();
        set.retain(|n| *n != last);

        assert!(set.current_page() < set.total_pages());
    }

    assert!(set.is_empty());
    assert_eq!(set.total_pages(), 1);
    assert_eq!(set.current_page(), 0);
}

#[test]
fn test_next_prev_are_noops_at_boundaries() {
    let mut set = PaginatedResultSet::new(vec![1, 2, 3], 2);

    assert!(!set.prev_page());
    assert_eq!(set.current_page(), 0);

    assert!(set.next_page());
    assert!(!set.next_page());
    assert_eq!(set.current_page(), 1);
    assert_eq!(set.page_items(), &[3]);
}

#[test]
fn test_replace_keeps_page_when_possible() {
    let mut set = PaginatedResultSet::new((0..30).collect::<Vec<u32>>(), 10);
    set.set_page(1);
    set.replace((100..125).collect());
    assert_eq!(set.current_page(), 1);
    assert_eq!(set.page_items()[0], 110);

    set.replace(vec![1]);
    assert_eq!(set.current_page(), 0);
}

#[test]
fn test_content_key_equality() {
    let a = ContentKey::new(ContentHash::new([7; 32]), 5);
    let b = ContentKey::new(ContentHash::new([7; 32]), 5);
    let c = ContentKey::new(ContentHash::new([8; 32]), 5);

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_large_file_entry_from_record() {
    let entry: LargeFileEntry = FileRecord::new("/x/y.bin", 42).into();
    assert_eq!(entry.path, PathBuf::from("/x/y.bin"));
    assert_eq!(entry.size, 42);
}

#[test]
fn test_deletion_record_line_has_three_fields() {
    let record = DeletionRecord::now("/tmp/file.txt", "large-files");
    let line = record.to_line();
    let fields: Vec<_> = line.split('\t').collect();

    assert_eq!(fields.len(), 3);
    assert_eq!(fields[1], "/tmp/file.txt");
    assert_eq!(fields[2], "large-files");
    assert!(!line.ends_with('\n'));
}

#[test]
fn test_scan_config_roundtrips_through_json() {
    let config = ScanConfig::new("/data").with_filter(ExtensionFilter::parse("mp4,MKV"));
    let json = serde_json::to_string(&config).unwrap();
    let parsed: ScanConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.root, PathBuf::from("/data"));
    assert!(parsed.filter.matches(Path::new("movie.mkv")));
    assert!(!parsed.filter.matches(Path::new("movie.avi")));
}
