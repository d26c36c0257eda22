use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Record file could not be opened, read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV/TSV processing
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// A data row that cannot be turned into a compression record
    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    /// JSON-RPC operations during extraction
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

/// RPC error types
#[derive(Error, Debug)]
pub enum RpcError {
    /// HTTP transport could not reach the node
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Node answered with a JSON-RPC error object
    #[error("RPC call failed: {method} - {message}")]
    CallFailed { method: String, message: String },

    /// Node answered, but the result could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Retry limit exceeded for RPC operation
    #[error("Max retries exceeded: {operation}")]
    MaxRetriesExceeded { operation: String },

    /// RPC request timed out
    #[error("Request timeout: {timeout_seconds}s for {operation}")]
    Timeout {
        timeout_seconds: u64,
        operation: String,
    },
}

impl RpcError {
    /// Errors worth another attempt; a well-formed error from the node is final
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RpcError::ConnectionFailed(_) | RpcError::Timeout { .. }
        )
    }
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
