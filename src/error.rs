//! Error types for the transfer workflow

use thiserror::Error;

/// Main error type for the transfer workflow
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error during {operation}: {message}")]
    Network { operation: String, message: String },

    #[error("Timeout waiting for {operation}")]
    Timeout { operation: String },

    #[error("RPC error during {operation}: [{code}] {message}")]
    Rpc {
        operation: String,
        code: i64,
        message: String,
    },

    #[error("Malformed RPC response during {operation}: {message}")]
    MalformedResponse { operation: String, message: String },

    #[error("HTTP status {status} during {operation}: {body}")]
    HttpStatus {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Coarse failure classes reported to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Network,
    Rpc,
    Signing,
    Output,
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::Config(_) => ErrorKind::Configuration,
            TransferError::Network { .. } | TransferError::Timeout { .. } => ErrorKind::Network,
            TransferError::Rpc { .. }
            | TransferError::MalformedResponse { .. }
            | TransferError::HttpStatus { .. } => ErrorKind::Rpc,
            TransferError::Signing(_) => ErrorKind::Signing,
            TransferError::Output(_) => ErrorKind::Output,
        }
    }

    pub(crate) fn network(operation: &str, message: impl ToString) -> Self {
        TransferError::Network {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn timeout(operation: &str) -> Self {
        TransferError::Timeout {
            operation: operation.to_string(),
        }
    }

    pub(crate) fn malformed(operation: &str, message: impl ToString) -> Self {
        TransferError::MalformedResponse {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type for transfer operations
pub type TransferResult<T> = Result<T, TransferError>;
