//! Extraction against an in-memory chain, read back by the loader

use anyhow::Result;
use rollup_compression_research::analysis::{AnalysisEngine, OverheadModels, SilentTrace};
use rollup_compression_research::errors::{AppError, RpcError, RpcResult};
use rollup_compression_research::processor::{Extractor, RecordLoader, DEPOSIT_TX_TYPE};
use rollup_compression_research::rpc::TransactionSource;
use std::collections::HashMap;
use tempfile::TempDir;

#[derive(Default)]
struct MockChain {
    head: u64,
    blocks: HashMap<u64, Vec<String>>,
    transactions: HashMap<String, Vec<u8>>,
    fail_block: Option<u64>,
}

impl MockChain {
    fn add_block(&mut self, number: u64, txs: Vec<(&str, Vec<u8>)>) {
        let hashes = txs.iter().map(|(hash, _)| hash.to_string()).collect();
        self.blocks.insert(number, hashes);
        for (hash, raw) in txs {
            self.transactions.insert(hash.to_string(), raw);
        }
    }
}

impl TransactionSource for MockChain {
    async fn latest_block_number(&self) -> RpcResult<u64> {
        Ok(self.head)
    }

    async fn block_transaction_hashes(&self, number: u64) -> RpcResult<Option<Vec<String>>> {
        if self.fail_block == Some(number) {
            return Err(RpcError::MaxRetriesExceeded {
                operation: "eth_getBlockByNumber".to_string(),
            });
        }
        Ok(self.blocks.get(&number).cloned())
    }

    async fn raw_transaction(&self, hash: &str) -> RpcResult<Option<Vec<u8>>> {
        Ok(self.transactions.get(hash).cloned())
    }
}

fn eip1559_payload(len: usize) -> Vec<u8> {
    std::iter::once(0x02u8)
        .chain((1..len).map(|i| (i % 7) as u8))
        .collect()
}

fn deposit_payload() -> Vec<u8> {
    vec![DEPOSIT_TX_TYPE, 0xf8, 0x01, 0x02, 0x03]
}

fn sample_chain() -> MockChain {
    let mut chain = MockChain {
        head: 105,
        ..Default::default()
    };
    chain.add_block(
        100,
        vec![("0xd0", deposit_payload()), ("0xa1", eip1559_payload(180))],
    );
    chain.add_block(
        101,
        vec![
            ("0xd1", deposit_payload()),
            ("0xa2", eip1559_payload(400)),
            ("0xa3", eip1559_payload(64)),
        ],
    );
    chain
}

#[tokio::test]
async fn test_deposits_are_never_emitted() -> Result<()> {
    let extractor = Extractor::new(sample_chain(), Some(100), 2);
    let mut buffer = Vec::new();

    let stats = extractor.extract(&mut buffer).await?;

    assert_eq!(stats.blocks_scanned, 2);
    assert_eq!(stats.transactions_seen, 5);
    assert_eq!(stats.deposits_skipped, 2);
    assert_eq!(stats.records_written, 3);

    let rows = RecordLoader::load_records_from_reader(buffer.as_slice())?;
    let ids: Vec<&str> = rows.iter().map(|r| r.record.transaction_id.as_str()).collect();
    assert_eq!(ids, vec!["0xa1", "0xa2", "0xa3"]);
    assert_eq!(rows[1].record.block_number, 101);
    assert_eq!(rows[1].record.original_size, 400);
    Ok(())
}

#[tokio::test]
async fn test_output_starts_with_header() -> Result<()> {
    let extractor = Extractor::new(sample_chain(), Some(100), 1);
    let mut buffer = Vec::new();
    extractor.extract(&mut buffer).await?;

    let text = String::from_utf8(buffer)?;
    assert!(text.starts_with(
        "block_number\toriginal_size\testimated_compressed_size\ttransaction_id\n"
    ));
    assert_eq!(text.lines().count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_default_start_is_head_minus_count() -> Result<()> {
    let extractor = Extractor::new(sample_chain(), None, 5);
    assert_eq!(extractor.resolve_start().await?, 100);

    let mut buffer = Vec::new();
    let stats = extractor.extract(&mut buffer).await?;
    assert_eq!(stats.first_block, 100);
    // Blocks 102..=104 are unknown to the mock
    assert_eq!(stats.blocks_scanned, 2);
    assert_eq!(stats.missing_blocks, 3);
    Ok(())
}

#[tokio::test]
async fn test_rpc_failure_aborts_extraction() {
    let mut chain = sample_chain();
    chain.fail_block = Some(101);
    let extractor = Extractor::new(chain, Some(100), 2);
    let mut buffer = Vec::new();

    let result = extractor.extract(&mut buffer).await;

    assert!(matches!(
        result,
        Err(AppError::Rpc(RpcError::MaxRetriesExceeded { .. }))
    ));
}

#[tokio::test]
async fn test_extract_then_analyse_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("out").join("result.tsv");
    let extractor = Extractor::new(sample_chain(), Some(100), 2);

    extractor.extract_to_path(&path).await?;
    let report = AnalysisEngine::new(OverheadModels::default()).analyse_file(&path, &mut SilentTrace)?;

    assert_eq!(report.total_records, 3);
    assert!(report.worst_case.is_some());
    Ok(())
}
