use rollup_compression_research::errors::AppError;
use rollup_compression_research::processor::RecordLoader;
use tempfile::TempDir;

use crate::common::{write_raw_file, write_record_file, HEADER};

#[test]
fn test_load_from_file_preserves_order_and_indices() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_record_file(&temp_dir, "records.tsv", &[(300, 200), (1000, 1200), (500, 520)]);

    let rows = RecordLoader::load_records(&path).unwrap();

    assert_eq!(rows.len(), 3);
    let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
    assert_eq!(rows[2].record.original_size, 500);
    assert_eq!(rows[2].record.block_number, 11_801_252);
}

#[test]
fn test_error_reports_file_line() {
    let temp_dir = TempDir::new().unwrap();
    let lines = vec![
        "1\t300\t200\t0xaa".to_string(),
        "1\t300\tlots\t0xbb".to_string(),
    ];
    let path = write_raw_file(&temp_dir, "bad.tsv", HEADER, &lines);

    match RecordLoader::load_records(&path) {
        Err(AppError::InvalidRecord { line, reason }) => {
            assert_eq!(line, 3);
            assert!(reason.contains("estimated_compressed_size"));
        }
        other => panic!("expected InvalidRecord, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_legacy_embedded_layout() {
    let temp_dir = TempDir::new().unwrap();
    let lines = vec!["\"9\t64\t70\t0xdd\"".to_string()];
    let path = write_raw_file(&temp_dir, "legacy.csv", "\"header\"", &lines);

    let rows = RecordLoader::load_records(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record.estimated_compressed_size, 70);
    assert_eq!(rows[0].raw, "9\t64\t70\t0xdd");
}
