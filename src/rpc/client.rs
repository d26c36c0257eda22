use crate::config::RpcConfig;
use crate::errors::{RpcError, RpcResult};
use crate::rpc::{calculate_next_backoff, execute_with_timeout, TransactionSource};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Ethereum JSON-RPC client with retry logic
pub struct EthRpcClient {
    http: reqwest::Client,
    config: RpcConfig,
    next_id: AtomicU64,
    error_count: Arc<AtomicU64>,
}

impl EthRpcClient {
    /// Create a client and verify the endpoint answers `eth_blockNumber`
    pub async fn new(config: RpcConfig) -> RpcResult<Self> {
        let client = Self::new_unchecked(config)?;
        let head = client.latest_block_number().await.map_err(|e| {
            RpcError::ConnectionFailed(format!(
                "Failed to reach {} - check the URL and that the node is running: {}",
                client.config.url, e
            ))
        })?;
        info!("RPC connection established, chain head at block {}", head);
        Ok(client)
    }

    /// Create a client without contacting the endpoint
    pub fn new_unchecked(config: RpcConfig) -> RpcResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RpcError::ConnectionFailed(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            config,
            next_id: AtomicU64::new(1),
            error_count: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Get the current error count from RPC operations
    pub fn get_error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Call `method` with retries on transient failures
    pub async fn call(&self, method: &str, params: Value) -> RpcResult<Value> {
        let mut backoff = Duration::from_millis(self.config.initial_backoff_ms);
        let mut attempt = 0;

        loop {
            let result =
                execute_with_timeout(self.config.timeout_seconds, method, self.send(method, &params))
                    .await;

            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    self.error_count.fetch_add(1, Ordering::Relaxed);
                    attempt += 1;
                    warn!(
                        "{} failed (attempt {}/{}), retrying in {:?}: {}",
                        method, attempt, self.config.max_retries, backoff, e
                    );
                    sleep(backoff).await;
                    backoff = calculate_next_backoff(
                        backoff,
                        self.config.backoff_multiplier,
                        self.config.max_backoff_seconds,
                    );
                }
                Err(e) if e.is_transient() => {
                    self.error_count.fetch_add(1, Ordering::Relaxed);
                    warn!("{} failed after {} retries: {}", method, attempt, e);
                    return Err(RpcError::MaxRetriesExceeded {
                        operation: method.to_string(),
                    });
                }
                Err(e) => {
                    self.error_count.fetch_add(1, Ordering::Relaxed);
                    return Err(e);
                }
            }
        }
    }

    async fn send(&self, method: &str, params: &Value) -> RpcResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!("-> {} #{}", method, id);
        let response = self
            .http
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RpcError::ConnectionFailed(format!(
                "{} returned HTTP {}",
                method, status
            )));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", method, e)))?;

        parse_envelope(method, envelope)
    }
}

fn parse_envelope(method: &str, envelope: RpcResponse) -> RpcResult<Value> {
    if let Some(error) = envelope.error {
        return Err(RpcError::CallFailed {
            method: method.to_string(),
            message: format!("{} (code {})", error.message, error.code),
        });
    }
    Ok(envelope.result.unwrap_or(Value::Null))
}

/// Parse a `0x`-prefixed hex quantity
pub fn parse_quantity(value: &Value) -> RpcResult<u64> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::InvalidResponse(format!("expected hex string, got {}", value)))?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    u64::from_str_radix(digits, 16)
        .map_err(|e| RpcError::InvalidResponse(format!("bad quantity '{}': {}", text, e)))
}

/// Extract transaction hashes from an `eth_getBlockByNumber(_, false)` result
pub fn parse_block_hashes(block: &Value) -> RpcResult<Option<Vec<String>>> {
    if block.is_null() {
        return Ok(None);
    }

    let transactions = block
        .get("transactions")
        .and_then(Value::as_array)
        .ok_or_else(|| RpcError::InvalidResponse("block without transactions array".into()))?;

    transactions
        .iter()
        .map(|tx| {
            tx.as_str()
                .map(str::to_string)
                .ok_or_else(|| RpcError::InvalidResponse(format!("expected tx hash, got {}", tx)))
        })
        .collect::<RpcResult<Vec<_>>>()
        .map(Some)
}

/// Decode an `eth_getRawTransactionByHash` result
pub fn parse_raw_transaction(value: &Value) -> RpcResult<Option<Vec<u8>>> {
    if value.is_null() {
        return Ok(None);
    }
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::InvalidResponse(format!("expected hex data, got {}", value)))?;
    hex::decode(text.strip_prefix("0x").unwrap_or(text))
        .map(Some)
        .map_err(|e| RpcError::InvalidResponse(format!("bad raw transaction hex: {}", e)))
}

impl TransactionSource for EthRpcClient {
    async fn latest_block_number(&self) -> RpcResult<u64> {
        let value = self.call("eth_blockNumber", json!([])).await?;
        parse_quantity(&value)
    }

    async fn block_transaction_hashes(&self, number: u64) -> RpcResult<Option<Vec<String>>> {
        let value = self
            .call("eth_getBlockByNumber", json!([format!("0x{:x}", number), false]))
            .await?;
        parse_block_hashes(&value)
    }

    async fn raw_transaction(&self, hash: &str) -> RpcResult<Option<Vec<u8>>> {
        let value = self
            .call("eth_getRawTransactionByHash", json!([hash]))
            .await?;
        parse_raw_transaction(&value)
    }
}
