use super::{ProgressReporter, StageMetrics, StandardProgressTracker};
use crate::errors::{AppError, AppResult, RpcError};
use crate::rpc::TransactionSource;
use crate::types::{CompressionRecord, RECORD_HEADER};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// EIP-2718 type byte of OP-stack deposit transactions
pub const DEPOSIT_TX_TYPE: u8 = 0x7E;

/// Extraction counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub first_block: u64,
    pub blocks_scanned: u64,
    pub missing_blocks: u64,
    pub transactions_seen: u64,
    pub deposits_skipped: u64,
    pub missing_transactions: u64,
    pub records_written: u64,
}

impl StageMetrics for ExtractionStats {
    fn format_custom_metrics(&self) -> String {
        format!(
            "Records: {} | Deposits skipped: {}",
            self.records_written, self.deposits_skipped
        )
    }
}

/// Build a record from an encoded transaction
///
/// Returns `None` for deposit transactions and empty payloads; those are never
/// published as batch data.
pub fn record_from_raw_transaction(
    block_number: u64,
    transaction_id: &str,
    raw: &[u8],
) -> Option<CompressionRecord> {
    match raw.first() {
        None => None,
        Some(&DEPOSIT_TX_TYPE) => None,
        Some(_) => Some(CompressionRecord {
            block_number,
            original_size: raw.len() as u64,
            estimated_compressed_size: op_alloy_flz::flz_compress_len(raw) as u64,
            transaction_id: transaction_id.to_string(),
        }),
    }
}

/// Walks a block range and writes one record per non-deposit transaction
pub struct Extractor<S> {
    source: S,
    block_range_start: Option<u64>,
    block_count: u64,
}

impl<S: TransactionSource> Extractor<S> {
    pub fn new(source: S, block_range_start: Option<u64>, block_count: u64) -> Self {
        Self {
            source,
            block_range_start,
            block_count,
        }
    }

    /// First block to scan; without a configured start this is
    /// `latest - block_count`
    pub async fn resolve_start(&self) -> AppResult<u64> {
        match self.block_range_start {
            Some(start) => Ok(start),
            None => {
                let latest = self.source.latest_block_number().await?;
                let start = latest.saturating_sub(self.block_count);
                info!("Chain head {}, starting at block {}", latest, start);
                Ok(start)
            }
        }
    }

    /// Extract into a new TSV file at `path`
    pub async fn extract_to_path(&self, path: &Path) -> AppResult<ExtractionStats> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path).map_err(AppError::Io)?;
        info!("Writing records to {}", path.display());
        self.extract(file).await
    }

    /// Extract into `writer` as TSV with a header row
    pub async fn extract<W: Write>(&self, writer: W) -> AppResult<ExtractionStats> {
        let start = self.resolve_start().await?;
        let mut stats = ExtractionStats {
            first_block: start,
            ..Default::default()
        };

        let mut tsv = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        tsv.write_record(RECORD_HEADER)?;

        let mut progress = StandardProgressTracker::new();
        progress.start();

        for number in start..start.saturating_add(self.block_count) {
            let hashes = match self.source.block_transaction_hashes(number).await? {
                Some(hashes) => hashes,
                None => {
                    warn!("Block {} not found, skipping", number);
                    stats.missing_blocks += 1;
                    continue;
                }
            };

            for hash in &hashes {
                stats.transactions_seen += 1;
                let raw = self
                    .source
                    .raw_transaction(hash)
                    .await?
                    .ok_or_else(|| {
                        RpcError::InvalidResponse(format!(
                            "transaction {} listed in block {} but not returned",
                            hash, number
                        ))
                    });

                let raw = match raw {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!("{}", e);
                        stats.missing_transactions += 1;
                        continue;
                    }
                };

                match record_from_raw_transaction(number, hash, &raw) {
                    Some(record) => {
                        tsv.write_record(record.to_fields())?;
                        stats.records_written += 1;
                    }
                    None => {
                        debug!("Skipping deposit transaction {}", hash);
                        stats.deposits_skipped += 1;
                    }
                }
            }

            stats.blocks_scanned += 1;
            if progress.should_report() {
                ProgressReporter::print_progress_line(&ProgressReporter::format_block_progress(
                    &stats,
                    stats.blocks_scanned + stats.missing_blocks,
                    self.block_count,
                    progress.elapsed_seconds(),
                ))?;
            }
        }

        tsv.flush()?;
        ProgressReporter::finish_progress_line();

        info!(
            "Extraction complete: {} blocks, {} transactions, {} records, {} deposits skipped in {}",
            stats.blocks_scanned,
            stats.transactions_seen,
            stats.records_written,
            stats.deposits_skipped,
            ProgressReporter::format_elapsed_time(progress.elapsed_seconds())
        );

        Ok(stats)
    }
}
