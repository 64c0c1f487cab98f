//! Broadcast of signed transactions to the injector endpoint
//!
//! The injector is a separate JSON-RPC endpoint (`INJECTOR_JSONRPC_URL`)
//! that accepts `eth_sendRawTransaction` and gossips the transaction on.
//! Each broadcast is a single POST; failures are never retried.

use crate::error::{TransferError, TransferResult};
use crate::rpc::{decode_response, JsonRpcOutcome, JsonRpcRequest};

use async_trait::async_trait;
use ethers::types::Bytes;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

pub const SEND_RAW_TRANSACTION: &str = "eth_sendRawTransaction";

/// Request id of every broadcast
pub const BROADCAST_REQUEST_ID: u64 = 1;

/// Write-side endpoint the signed transaction is submitted to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Submit a signed transaction; returns the `result` of the call
    async fn send_raw_transaction(&self, raw: &Bytes) -> TransferResult<String>;
}

/// reqwest-backed injector client
pub struct InjectorClient {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl InjectorClient {
    pub fn new(url: Url, call_timeout: Duration) -> TransferResult<Self> {
        let client = Client::builder()
            .timeout(call_timeout)
            .build()
            .map_err(|e| TransferError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            timeout: call_timeout,
        })
    }

    async fn post(&self, request: &JsonRpcRequest<[String; 1]>) -> TransferResult<(u16, String)> {
        let send = async {
            let response = self.client.post(self.url.clone()).json(request).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        match timeout(self.timeout, send).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) if e.is_timeout() => Err(TransferError::timeout(SEND_RAW_TRANSACTION)),
            Ok(Err(e)) => Err(TransferError::network(SEND_RAW_TRANSACTION, e)),
            Err(_) => Err(TransferError::timeout(SEND_RAW_TRANSACTION)),
        }
    }
}

#[async_trait]
impl Broadcaster for InjectorClient {
    async fn send_raw_transaction(&self, raw: &Bytes) -> TransferResult<String> {
        let signed_hex = format!("0x{}", hex::encode(raw.as_ref()));
        let request = JsonRpcRequest::new(SEND_RAW_TRANSACTION, [signed_hex], BROADCAST_REQUEST_ID);
        debug!("Broadcasting {} bytes to {}", raw.len(), self.url);

        let (status, body) = self.post(&request).await?;
        let outcome = decode_response::<String>(SEND_RAW_TRANSACTION, &body, BROADCAST_REQUEST_ID);

        if !(200..300).contains(&status) {
            // a JSON-RPC error body says more than the status code
            if let Ok(JsonRpcOutcome::Failure(error)) = outcome {
                return JsonRpcOutcome::<String>::Failure(error).into_result(SEND_RAW_TRANSACTION);
            }
            warn!("Injector answered HTTP {}", status);
            return Err(TransferError::HttpStatus {
                operation: SEND_RAW_TRANSACTION.to_string(),
                status,
                body,
            });
        }

        outcome?.into_result(SEND_RAW_TRANSACTION)
    }
}
