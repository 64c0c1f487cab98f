//! The transfer pipeline
//!
//! Steps run strictly in order and the first failure ends the run:
//! chain state -> draft -> populate -> gas override -> sign -> broadcast.
//! Every intermediate value is written to the console.

use crate::chain::ChainReader;
use crate::error::{TransferError, TransferResult};
use crate::injector::Broadcaster;
use crate::report::Console;
use crate::tx::{build_draft, tx_hash, ChainState, GasOverride, TransferSigner};

use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, H256, U256};
use std::io::Write;
use tracing::{info, warn};

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub sender: Address,
    pub chain_state: ChainState,
    /// Draft before populate
    pub draft: TypedTransaction,
    /// Populated transaction with the gas override applied, as signed
    pub populated: TypedTransaction,
    pub signed: Bytes,
    /// Hash of `signed`
    pub tx_hash: H256,
    /// `result` of the broadcast call
    pub broadcast_result: String,
}

/// Self-transfer pipeline over a read endpoint and a broadcast endpoint
pub struct TransferWorkflow<R, B> {
    reader: R,
    broadcaster: B,
    signer: TransferSigner,
    gas: GasOverride,
}

impl<R: ChainReader, B: Broadcaster> TransferWorkflow<R, B> {
    pub fn new(reader: R, broadcaster: B, signer: TransferSigner, gas: GasOverride) -> Self {
        Self {
            reader,
            broadcaster,
            signer,
            gas,
        }
    }

    /// Run every step once
    pub async fn run<W: Write>(&self, console: &mut Console<W>) -> TransferResult<TransferReceipt> {
        let sender = self.signer.address();
        console.sender(sender)?;

        let chain_state = self.query_chain_state(sender).await?;
        console.nonce(chain_state.nonce)?;
        console.chain_id(chain_state.chain_id)?;

        let draft = build_draft(sender, &chain_state);
        console.transaction("unsigned-raw-tx", &draft)?;

        let mut populated = self.populate(sender, &draft).await?;
        self.gas.apply(&mut populated);
        console.transaction("unsigned-tx", &populated)?;

        let signed = self.signer.sign(&populated).await?;
        let tx_hash = tx_hash(&signed);
        console.signed(&signed)?;
        info!("Signed transaction {:?}", tx_hash);

        let broadcast_result = self.broadcaster.send_raw_transaction(&signed).await?;
        console.broadcast(&broadcast_result)?;

        if broadcast_result.parse::<H256>().ok() != Some(tx_hash) {
            warn!(
                "Injector returned {} but the signed transaction hashes to {:?}",
                broadcast_result, tx_hash
            );
        }
        info!("Broadcast accepted: {}", broadcast_result);

        Ok(TransferReceipt {
            sender,
            chain_state,
            draft,
            populated,
            signed,
            tx_hash,
            broadcast_result,
        })
    }

    async fn query_chain_state(&self, sender: Address) -> TransferResult<ChainState> {
        let nonce = self.reader.transaction_count(sender).await?;
        info!("Nonce for {:?}: {}", sender, nonce);

        let chain_id = self.reader.chain_id().await?;
        if chain_id > U256::from(u64::MAX) {
            return Err(TransferError::malformed(
                "eth_chainId",
                format!("chain id {} does not fit in 64 bits", chain_id),
            ));
        }
        let chain_id = chain_id.as_u64();
        info!("Chain id: {}", chain_id);

        Ok(ChainState { nonce, chain_id })
    }

    async fn populate(
        &self,
        sender: Address,
        draft: &TypedTransaction,
    ) -> TransferResult<TypedTransaction> {
        let mut tx = draft.clone();
        tx.set_from(sender);
        self.reader.fill_transaction(&mut tx).await?;
        info!(
            "Populated transaction: gas price {:?}, gas limit {:?}",
            tx.gas_price(),
            tx.gas()
        );
        Ok(tx)
    }
}
