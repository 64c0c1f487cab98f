//! ethers HTTP provider with per-call timeouts and error classification

use super::ChainReader;
use crate::error::{TransferError, TransferResult};

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider, ProviderError, RpcError};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, U256};
use reqwest::Url;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Read endpoint wrapper
pub struct ChainProvider {
    http: Provider<Http>,
    /// Applied to every call
    timeout: Duration,
}

impl ChainProvider {
    /// Create a provider for `url`. Makes no network calls.
    pub fn new(url: &Url, call_timeout: Duration) -> TransferResult<Self> {
        let http = Provider::<Http>::try_from(url.as_str())
            .map_err(|e| TransferError::Config(format!("Invalid RPC URL {}: {}", url, e)))?;
        debug!("Created HTTP provider for {}", url);

        Ok(Self {
            http,
            timeout: call_timeout,
        })
    }

    async fn call<T, F>(&self, operation: &str, fut: F) -> TransferResult<T>
    where
        F: Future<Output = Result<T, ProviderError>> + Send,
    {
        match timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(classify(operation, e)),
            Err(_) => Err(TransferError::timeout(operation)),
        }
    }
}

#[async_trait]
impl ChainReader for ChainProvider {
    async fn transaction_count(&self, address: Address) -> TransferResult<U256> {
        self.call(
            "eth_getTransactionCount",
            self.http.get_transaction_count(address, None),
        )
        .await
    }

    async fn chain_id(&self) -> TransferResult<U256> {
        self.call("eth_chainId", self.http.get_chainid()).await
    }

    async fn fill_transaction(&self, tx: &mut TypedTransaction) -> TransferResult<()> {
        self.call("fill transaction", self.http.fill_transaction(tx, None))
            .await
    }
}

/// Map a provider failure onto the error taxonomy
fn classify(operation: &str, err: ProviderError) -> TransferError {
    if let Some(response) = err.as_error_response() {
        return TransferError::Rpc {
            operation: operation.to_string(),
            code: response.code,
            message: response.message.clone(),
        };
    }
    if let Some(serde_err) = err.as_serde_error() {
        return TransferError::malformed(operation, serde_err);
    }
    TransferError::network(operation, err)
}
