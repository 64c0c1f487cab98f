//! Chain module - read access to the node behind `JSONRPC_URL`
//!
//! This module provides:
//! - The `ChainReader` seam the workflow queries chain state through
//! - `ChainProvider`, the ethers HTTP implementation with per-call timeouts

pub mod provider;

pub use provider::ChainProvider;

use crate::error::TransferResult;

use async_trait::async_trait;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, U256};

/// Read-side chain queries used by the transfer workflow
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Transaction count of `address` at the latest block
    async fn transaction_count(&self, address: Address) -> TransferResult<U256>;

    /// Chain id reported by the node
    async fn chain_id(&self) -> TransferResult<U256>;

    /// Fill the fields the node has defaults for (gas price, gas limit)
    async fn fill_transaction(&self, tx: &mut TypedTransaction) -> TransferResult<()>;
}
