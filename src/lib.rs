//! Self-transfer through a JSON-RPC injector
//!
//! Reads the sender's nonce and the chain id from one endpoint, builds a
//! legacy transaction sending one native unit back to the sender, pins the
//! gas fields, signs it locally and submits it with `eth_sendRawTransaction`
//! to a second (injector) endpoint.

pub mod chain;
pub mod config;
pub mod error;
pub mod injector;
pub mod report;
pub mod rpc;
pub mod transfer;
pub mod tx;

pub use config::Settings;
pub use error::{ErrorKind, TransferError, TransferResult};
pub use transfer::{TransferReceipt, TransferWorkflow};
