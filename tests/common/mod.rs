//! Common Test Utilities
//!
//! Shared helpers for writing record files and collecting worst-case traces.

#![allow(dead_code)]

use rollup_compression_research::analysis::WorstCaseUpdate;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: &str = "block_number\toriginal_size\testimated_compressed_size\ttransaction_id";

/// Write `rows` of (original, compressed) under the standard header
pub fn write_record_file(temp_dir: &TempDir, name: &str, rows: &[(u64, u64)]) -> PathBuf {
    let lines: Vec<String> = rows
        .iter()
        .enumerate()
        .map(|(i, (original, compressed))| {
            format!("{}\t{}\t{}\t0x{:064x}", 11_801_250 + i as u64, original, compressed, i + 1)
        })
        .collect();
    write_raw_file(temp_dir, name, HEADER, &lines)
}

/// Write an arbitrary header and data lines
pub fn write_raw_file(temp_dir: &TempDir, name: &str, header: &str, lines: &[String]) -> PathBuf {
    let path = temp_dir.path().join(name);
    let mut file = File::create(&path).expect("Failed to create record file");
    writeln!(file, "{}", header).expect("Failed to write header");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write row");
    }
    path
}

/// Observed (row index, running minimum, diagnostic margin) triples
#[derive(Default)]
pub struct TraceRecorder {
    pub updates: Vec<(usize, i64, i64)>,
    pub lines: Vec<String>,
}

impl TraceRecorder {
    pub fn observe(&mut self, update: &WorstCaseUpdate<'_>) {
        self.updates
            .push((update.row_index, update.margin, update.diagnostic_margin));
        self.lines.push(update.trace_line());
    }
}
