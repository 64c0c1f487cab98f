//! Sender identity and transaction signing

use crate::config::PrivateKey;
use crate::error::{TransferError, TransferResult};

use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, H256};
use ethers::utils::keccak256;
use tracing::debug;

/// Local secp256k1 signer for the sender
#[derive(Debug, Clone)]
pub struct TransferSigner {
    wallet: LocalWallet,
}

impl TransferSigner {
    /// Load the signer from a raw private key
    pub fn new(key: &PrivateKey) -> TransferResult<Self> {
        let wallet = LocalWallet::from_bytes(key.as_bytes())
            .map_err(|e| TransferError::Config(format!("Invalid private key: {}", e)))?;
        Ok(Self { wallet })
    }

    /// Sender address derived from the key
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Sign a populated transaction and return its RLP encoding.
    ///
    /// The transaction must carry a non-zero chain id; it is used for
    /// EIP-155 replay protection.
    pub async fn sign(&self, tx: &TypedTransaction) -> TransferResult<Bytes> {
        let chain_id = tx
            .chain_id()
            .ok_or_else(|| TransferError::Signing("transaction has no chain id".to_string()))?;
        if chain_id.is_zero() {
            return Err(TransferError::Signing("chain id must be non-zero".to_string()));
        }
        if let Some(from) = tx.from() {
            if *from != self.address() {
                return Err(TransferError::Signing(format!(
                    "transaction sender {:?} does not match signer {:?}",
                    from,
                    self.address()
                )));
            }
        }

        let wallet = self.wallet.clone().with_chain_id(chain_id.as_u64());
        let signature = wallet
            .sign_transaction(tx)
            .await
            .map_err(|e| TransferError::Signing(e.to_string()))?;

        let raw = tx.rlp_signed(&signature);
        debug!("Signed transaction {:?} ({} bytes)", tx_hash(&raw), raw.len());
        Ok(raw)
    }
}

/// Hash of a signed transaction as nodes report it
pub fn tx_hash(raw: &Bytes) -> H256 {
    H256::from(keccak256(raw.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{build_draft, ChainState, GasOverride};
    use ethers::types::{Transaction, U256};
    use ethers::utils::rlp;

    // well-known development key
    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn signer() -> TransferSigner {
        TransferSigner::new(&PrivateKey::parse(KEY).unwrap()).unwrap()
    }

    fn populated(signer: &TransferSigner, chain_id: u64) -> TypedTransaction {
        let mut tx = build_draft(
            signer.address(),
            &ChainState {
                nonce: U256::from(5),
                chain_id,
            },
        );
        tx.set_from(signer.address());
        GasOverride::default().apply(&mut tx);
        tx
    }

    #[test]
    fn test_address_from_key() {
        let expected: Address = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23".parse().unwrap();
        assert_eq!(signer().address(), expected);
    }

    #[test]
    fn test_zero_key_rejected() {
        let key = PrivateKey::parse(&"00".repeat(32)).unwrap();
        let err = TransferSigner::new(&key).unwrap_err();
        assert!(matches!(err, TransferError::Config(_)));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let printed = format!("{:?}", signer());
        assert!(!printed.contains(&KEY[2..]));
    }

    #[tokio::test]
    async fn test_sign_is_deterministic_and_decodable() {
        let signer = signer();
        let tx = populated(&signer, 1337);

        let first = signer.sign(&tx).await.unwrap();
        let second = signer.sign(&tx).await.unwrap();
        assert_eq!(first, second);

        let decoded: Transaction = rlp::decode(first.as_ref()).unwrap();
        assert_eq!(decoded.nonce, U256::from(5));
        assert_eq!(decoded.to, Some(signer.address()));
        assert_eq!(decoded.gas, crate::tx::DEFAULT_GAS_LIMIT);
        assert_eq!(decoded.gas_price, Some(crate::tx::DEFAULT_GAS_PRICE));
        assert_eq!(decoded.chain_id, Some(U256::from(1337)));
        assert_eq!(decoded.recover_from().unwrap(), signer.address());
        assert_eq!(decoded.hash, tx_hash(&first));
    }

    #[tokio::test]
    async fn test_missing_chain_id() {
        let signer = signer();
        let mut tx = populated(&signer, 1337);
        if let TypedTransaction::Legacy(ref mut inner) = tx {
            inner.chain_id = None;
        }

        let err = signer.sign(&tx).await.unwrap_err();
        assert!(matches!(err, TransferError::Signing(_)));
    }

    #[tokio::test]
    async fn test_zero_chain_id() {
        let signer = signer();
        let tx = populated(&signer, 0);
        assert!(matches!(
            signer.sign(&tx).await,
            Err(TransferError::Signing(_))
        ));
    }

    #[tokio::test]
    async fn test_foreign_sender_rejected() {
        let signer = signer();
        let mut tx = populated(&signer, 1337);
        tx.set_from(Address::repeat_byte(0x42));
        assert!(matches!(
            signer.sign(&tx).await,
            Err(TransferError::Signing(_))
        ));
    }
}
