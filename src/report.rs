//! Human-readable progress report written to stdout

use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, U256};
use ethers::utils::to_checksum;
use serde_json::Value;
use std::io::{self, Write};

pub const SEPARATOR: &str = ">>> ====    ====    ====    ====";

/// Console sink for each workflow step
pub struct Console<W> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn sender(&mut self, address: Address) -> io::Result<()> {
        writeln!(self.out, ">>> sender   address: {}", to_checksum(&address, None))
    }

    pub fn nonce(&mut self, nonce: U256) -> io::Result<()> {
        writeln!(self.out, ">>> nonce: {}", nonce)
    }

    pub fn chain_id(&mut self, chain_id: u64) -> io::Result<()> {
        writeln!(self.out, ">>> chain-id: {}", chain_id)
    }

    /// Labelled pretty JSON of a transaction, closed by the separator
    pub fn transaction(&mut self, label: &str, tx: &TypedTransaction) -> io::Result<()> {
        writeln!(self.out, ">>> {}:", label)?;
        serde_json::to_writer_pretty(&mut self.out, &transaction_json(tx)?)
            .map_err(io::Error::from)?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", SEPARATOR)
    }

    pub fn signed(&mut self, raw: &Bytes) -> io::Result<()> {
        writeln!(self.out, ">>> signed-tx:")?;
        writeln!(self.out, "0x{}", hex::encode(raw.as_ref()))?;
        writeln!(self.out, "{}", SEPARATOR)
    }

    pub fn broadcast(&mut self, result: &str) -> io::Result<()> {
        writeln!(self.out, "P2P Broadcast: {}", result)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// JSON view of a transaction including its chain id.
///
/// `TransactionRequest` never serializes `chain_id`, so it is added here.
pub fn transaction_json(tx: &TypedTransaction) -> serde_json::Result<Value> {
    let mut json = serde_json::to_value(tx)?;
    if let (Some(chain_id), Value::Object(fields)) = (tx.chain_id(), &mut json) {
        fields.insert("chainId".to_string(), serde_json::to_value(chain_id)?);
    }
    Ok(json)
}
