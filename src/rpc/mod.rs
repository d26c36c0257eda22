//! Ethereum JSON-RPC integration module
//!
//! This module provides the node access used by extraction:
//! - **Client** - Async JSON-RPC 2.0 client over HTTP with retry logic
//! - **Retry** - Exponential backoff and timeout helpers
//!
//! The extractor is generic over [`TransactionSource`], so it can run against
//! an in-memory source in tests.

pub mod client;
pub mod retry;

// Re-export main types
pub use client::EthRpcClient;
pub use retry::{calculate_next_backoff, execute_with_timeout};

use crate::errors::RpcResult;

/// Read access to blocks and raw transactions
#[allow(async_fn_in_trait)]
pub trait TransactionSource {
    /// Height of the chain head
    async fn latest_block_number(&self) -> RpcResult<u64>;

    /// Transaction hashes of block `number`, or `None` if the block is unknown
    async fn block_transaction_hashes(&self, number: u64) -> RpcResult<Option<Vec<String>>>;

    /// EIP-2718 encoded bytes of a transaction, or `None` if it is unknown
    async fn raw_transaction(&self, hash: &str) -> RpcResult<Option<Vec<u8>>>;
}
