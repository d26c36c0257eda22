use crate::errors::{AppError, AppResult};
use crate::types::{CompressionRecord, RecordRow};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Largest accepted size field; keeps every margin well inside `i64`
pub const MAX_RECORD_SIZE: u64 = u32::MAX as u64;

/// Loader for extractor record files
///
/// Rows are TAB-delimited: `block_number, original_size,
/// estimated_compressed_size, transaction_id`. Files written by the legacy
/// tool carry the group as the first field of a comma-separated row, and
/// read identically here. That tool also wrote five columns, `block, length,
/// op-geth compressed size, FastLZ length, hash`; for those rows the op-geth
/// size is the estimate and the FastLZ column is kept only in the raw text.
pub struct RecordLoader;

impl RecordLoader {
    /// Read and validate every data row of `path`
    ///
    /// The first row is a header and is skipped without validation. The file
    /// handle is released when this returns, whether or not loading succeeded.
    pub fn load_records(path: &Path) -> AppResult<Vec<RecordRow>> {
        info!("Loading records from {}", path.display());
        let file = File::open(path).map_err(AppError::Io)?;
        Self::load_records_from_reader(BufReader::new(file))
    }

    /// Same as [`RecordLoader::load_records`] for any reader
    pub fn load_records_from_reader<R: Read>(reader: R) -> AppResult<Vec<RecordRow>> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true) // Never validated as data
            .flexible(true) // Field count is checked per row below
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (position, result) in csv_reader.records().enumerate() {
            let record = result.map_err(AppError::Csv)?;
            let index = position + 1;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 1);

            let fields = Self::split_fields(&record);
            let compression_record = Self::parse_fields(&fields, line)?;
            rows.push(RecordRow {
                index,
                raw: fields.join("\t"),
                record: compression_record,
            });
        }

        debug!("Loaded {} data rows", rows.len());
        Ok(rows)
    }

    /// A single field holding TABs is the legacy embedded layout
    fn split_fields(record: &StringRecord) -> Vec<String> {
        match record.len() {
            1 => record[0].split('\t').map(|f| f.trim().to_string()).collect(),
            _ => record.iter().map(str::to_string).collect(),
        }
    }

    fn parse_fields(fields: &[String], line: usize) -> AppResult<CompressionRecord> {
        let transaction_id = match fields.len() {
            4 => &fields[3],
            5 => &fields[4],
            n => {
                return Err(AppError::InvalidRecord {
                    line,
                    reason: format!("expected 4 or 5 fields, found {}", n),
                })
            }
        };

        let block_number = parse_integer(&fields[0], "block_number", line)?;
        let original_size = parse_size(&fields[1], "original_size", line)?;
        let estimated_compressed_size = parse_size(&fields[2], "estimated_compressed_size", line)?;

        if original_size == 0 {
            return Err(AppError::InvalidRecord {
                line,
                reason: "original_size must be greater than 0".to_string(),
            });
        }

        Ok(CompressionRecord {
            block_number,
            original_size,
            estimated_compressed_size,
            transaction_id: transaction_id.clone(),
        })
    }
}

/// Parse a size field, bounded by [`MAX_RECORD_SIZE`]
fn parse_size(value: &str, field: &str, line: usize) -> AppResult<u64> {
    let size = parse_integer(value, field, line)?;
    if size > MAX_RECORD_SIZE {
        return Err(AppError::InvalidRecord {
            line,
            reason: format!("{} {} exceeds the limit of {}", field, size, MAX_RECORD_SIZE),
        });
    }
    Ok(size)
}

/// Parse a non-negative decimal integer
fn parse_integer(value: &str, field: &str, line: usize) -> AppResult<u64> {
    let parsed: i64 = value.parse().map_err(|_| AppError::InvalidRecord {
        line,
        reason: format!("{} '{}' is not an integer", field, value),
    })?;

    u64::try_from(parsed).map_err(|_| AppError::InvalidRecord {
        line,
        reason: format!("{} '{}' must not be negative", field, value),
    })
}
