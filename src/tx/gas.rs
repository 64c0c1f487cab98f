//! Fixed gas parameters applied after the populate step

use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::U256;
use tracing::{debug, warn};

/// Gas price of 1 wei
pub const DEFAULT_GAS_PRICE: U256 = U256([1, 0, 0, 0]);

/// Gas limit of 2^64 (0x10000000000000000). Larger than any real block gas
/// limit, nodes are free to reject it.
pub const DEFAULT_GAS_LIMIT: U256 = U256([0, 1, 0, 0]);

/// Gas values that replace whatever the provider filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasOverride {
    pub gas_price: U256,
    pub gas_limit: U256,
}

impl GasOverride {
    pub fn new(gas_price: U256, gas_limit: U256) -> Self {
        Self {
            gas_price,
            gas_limit,
        }
    }

    /// Overwrite gas price and gas limit unconditionally
    pub fn apply(&self, tx: &mut TypedTransaction) {
        match self.max_fee() {
            Some(max_fee) => debug!(
                "Overriding gas: price {:?} -> {}, limit {:?} -> {}, max fee {} wei",
                tx.gas_price(),
                self.gas_price,
                tx.gas(),
                self.gas_limit,
                max_fee
            ),
            None => warn!(
                "Gas limit {} at price {} overflows the maximum fee",
                self.gas_limit, self.gas_price
            ),
        }
        tx.set_gas_price(self.gas_price);
        tx.set_gas(self.gas_limit);
    }

    /// Upper bound on the fee in wei, `None` if it overflows 256 bits
    pub fn max_fee(&self) -> Option<U256> {
        self.gas_limit.checked_mul(self.gas_price)
    }
}

impl Default for GasOverride {
    fn default() -> Self {
        Self::new(DEFAULT_GAS_PRICE, DEFAULT_GAS_LIMIT)
    }
}
