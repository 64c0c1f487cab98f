//! JSON-RPC 2.0 envelope types
//!
//! Responses are decoded strictly: the version must be `"2.0"`, the id must
//! echo the request, and exactly one of `result` or `error` must be present.

use crate::error::{TransferError, TransferResult};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Request envelope. Field order is the wire order.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: P,
    pub id: u64,
}

impl<P: Serialize> JsonRpcRequest<P> {
    pub fn new(method: &'static str, params: P, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id,
        }
    }
}

/// Error object of a failed call
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Decoded response
#[derive(Debug, Clone, PartialEq)]
pub enum JsonRpcOutcome<T> {
    Success(T),
    Failure(JsonRpcErrorObject),
}

impl<T> JsonRpcOutcome<T> {
    /// Turn a failure envelope into `TransferError::Rpc`
    pub fn into_result(self, operation: &str) -> TransferResult<T> {
        match self {
            JsonRpcOutcome::Success(value) => Ok(value),
            JsonRpcOutcome::Failure(err) => Err(TransferError::Rpc {
                operation: operation.to_string(),
                code: err.code,
                message: err.message,
            }),
        }
    }
}

#[derive(Deserialize)]
struct RawResponse {
    jsonrpc: String,
    #[serde(default)]
    id: Value,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

/// Decode a response body for the request with id `expected_id`
pub fn decode_response<T: DeserializeOwned>(
    operation: &str,
    body: &str,
    expected_id: u64,
) -> TransferResult<JsonRpcOutcome<T>> {
    let raw: RawResponse = serde_json::from_str(body)
        .map_err(|e| TransferError::malformed(operation, format!("{}: {}", e, body)))?;

    if raw.jsonrpc != JSONRPC_VERSION {
        return Err(TransferError::malformed(
            operation,
            format!("unsupported jsonrpc version {:?}", raw.jsonrpc),
        ));
    }

    match (raw.result, raw.error) {
        (Some(_), Some(_)) => Err(TransferError::malformed(
            operation,
            "response carries both result and error",
        )),
        (None, Some(error)) => {
            // servers answer unparseable requests with a null id
            if !raw.id.is_null() && raw.id.as_u64() != Some(expected_id) {
                return Err(id_mismatch(operation, &raw.id, expected_id));
            }
            Ok(JsonRpcOutcome::Failure(error))
        }
        (Some(result), None) => {
            if raw.id.as_u64() != Some(expected_id) {
                return Err(id_mismatch(operation, &raw.id, expected_id));
            }
            let value = serde_json::from_value(result)
                .map_err(|e| TransferError::malformed(operation, format!("bad result: {}", e)))?;
            Ok(JsonRpcOutcome::Success(value))
        }
        (None, None) => Err(TransferError::malformed(
            operation,
            "response has neither result nor error",
        )),
    }
}

fn id_mismatch(operation: &str, got: &Value, expected: u64) -> TransferError {
    TransferError::malformed(
        operation,
        format!("response id {} does not match request id {}", got, expected),
    )
}
