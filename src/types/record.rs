use serde::{Deserialize, Serialize};

/// Column names written by the extractor; the loader never validates them
pub const RECORD_HEADER: [&str; 4] = [
    "block_number",
    "original_size",
    "estimated_compressed_size",
    "transaction_id",
];

/// One observation per transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionRecord {
    pub block_number: u64,
    /// Serialized transaction length in bytes, always > 0
    pub original_size: u64,
    /// Reference compressed length in bytes
    pub estimated_compressed_size: u64,
    /// Opaque identifier (transaction hash), carried for traceability only
    pub transaction_id: String,
}

impl CompressionRecord {
    /// Field values in header order
    pub fn to_fields(&self) -> [String; 4] {
        [
            self.block_number.to_string(),
            self.original_size.to_string(),
            self.estimated_compressed_size.to_string(),
            self.transaction_id.clone(),
        ]
    }

    /// Whether the estimate failed to shrink the transaction at all
    pub fn is_expansion(&self) -> bool {
        self.estimated_compressed_size > self.original_size
    }
}

/// A loaded record with its position and source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    /// 1-based data row index, header excluded
    pub index: usize,
    /// Row text as read, fields joined by TAB
    pub raw: String,
    pub record: CompressionRecord,
}

impl RecordRow {
    pub fn new(index: usize, record: CompressionRecord) -> Self {
        let raw = record.to_fields().join("\t");
        Self { index, raw, record }
    }
}
