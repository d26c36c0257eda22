use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::processor::Extractor;
use crate::rpc::EthRpcClient;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Extract records from a JSON-RPC endpoint
#[derive(Args, Default)]
pub struct ExtractCommand {
    /// JSON-RPC URL (overrides rpc.url)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// First block to scan (default: chain head minus block count)
    #[arg(long)]
    pub start_block: Option<u64>,

    /// Number of blocks to scan (overrides extraction.block_count)
    #[arg(long)]
    pub block_count: Option<u64>,

    /// Output record file (overrides paths.input_path)
    #[arg(long)]
    pub output_path: Option<PathBuf>,
}

impl ExtractCommand {
    pub async fn run(&self, app_config: &AppConfig) -> AppResult<()> {
        info!("=== Transaction Record Extraction ===");

        let mut rpc_config = app_config.rpc.clone();
        if let Some(url) = &self.rpc_url {
            rpc_config.url = url.clone();
        }
        let start = self.start_block.or(app_config.extraction.block_range_start);
        let block_count = self.block_count.unwrap_or(app_config.extraction.block_count);
        let output_path = self
            .output_path
            .clone()
            .unwrap_or_else(|| app_config.paths.input_path.clone());

        info!("Configuration:");
        info!("  RPC: {}", rpc_config.url);
        info!("  Start block: {:?}", start);
        info!("  Block count: {}", block_count);
        info!("  Output: {}", output_path.display());

        let client = EthRpcClient::new(rpc_config).await?;
        let extractor = Extractor::new(client, start, block_count);
        let stats = extractor.extract_to_path(&output_path).await?;

        println!("\n=== EXTRACTION COMPLETE ===");
        println!(
            "Blocks scanned: {} (from {}, {} missing)",
            stats.blocks_scanned, stats.first_block, stats.missing_blocks
        );
        println!("Transactions seen: {}", stats.transactions_seen);
        println!("Deposit transactions skipped: {}", stats.deposits_skipped);
        println!("Transactions not returned: {}", stats.missing_transactions);
        println!("Records written: {}", stats.records_written);
        println!("\nRecords written to: {}", output_path.display());

        Ok(())
    }
}
