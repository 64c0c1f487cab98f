//! Transaction construction: draft building, gas override and signing

mod draft;
mod gas;
mod signer;

pub use draft::{build_draft, ChainState, TRANSFER_VALUE_WEI};
pub use gas::{GasOverride, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE};
pub use signer::{tx_hash, TransferSigner};
