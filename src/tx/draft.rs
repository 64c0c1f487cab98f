//! Unsigned draft of the self-transfer

use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, TransactionRequest, U256};

/// One whole native unit (10^18 wei)
pub const TRANSFER_VALUE_WEI: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Chain state the draft is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainState {
    /// Sender's transaction count at the latest block
    pub nonce: U256,
    pub chain_id: u64,
}

/// Build the legacy (type 0) draft sending one unit from `sender` back to itself.
///
/// Gas fields are left empty for the populate step.
pub fn build_draft(sender: Address, state: &ChainState) -> TypedTransaction {
    let request = TransactionRequest::new()
        .to(sender)
        .nonce(state.nonce)
        .value(TRANSFER_VALUE_WEI)
        .chain_id(state.chain_id);

    TypedTransaction::Legacy(request)
}
