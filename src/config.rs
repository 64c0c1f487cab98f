//! Configuration management for the transfer workflow
//!
//! Everything is read from environment variables once at start-up. Required
//! variables are checked before any value is parsed, and every value is parsed
//! before the first network call.

use crate::error::{TransferError, TransferResult};
use crate::tx::GasOverride;

use ethers::types::U256;
use reqwest::Url;
use std::env;
use std::fmt;
use std::time::Duration;

pub const JSONRPC_URL: &str = "JSONRPC_URL";
pub const INJECTOR_JSONRPC_URL: &str = "INJECTOR_JSONRPC_URL";
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
pub const TRANSFER_GAS_PRICE: &str = "TRANSFER_GAS_PRICE";
pub const TRANSFER_GAS_LIMIT: &str = "TRANSFER_GAS_LIMIT";
pub const TRANSFER_RPC_TIMEOUT_SECS: &str = "TRANSFER_RPC_TIMEOUT_SECS";

/// Default per-call network timeout
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

const REQUIRED: [&str; 3] = [JSONRPC_URL, INJECTOR_JSONRPC_URL, PRIVATE_KEY];

/// Root configuration structure
#[derive(Debug, Clone)]
pub struct Settings {
    /// Read endpoint for nonce, chain id and populate queries
    pub jsonrpc_url: Url,
    /// Write endpoint used only for the broadcast
    pub injector_url: Url,
    pub private_key: PrivateKey,
    pub gas: GasOverride,
    pub rpc_timeout: Duration,
}

/// 32-byte secp256k1 secret, never printed
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    pub fn parse(raw: &str) -> TransferResult<Self> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(digits).map_err(|e| {
            TransferError::Config(format!("{} is not valid hex: {}", PRIVATE_KEY, e))
        })?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            TransferError::Config(format!(
                "{} must be 32 bytes, got {}",
                PRIVATE_KEY,
                b.len()
            ))
        })?;

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn load() -> TransferResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> TransferResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|name| get(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(TransferError::Config(format!(
                "missing required environment variable(s): {}",
                missing.join(", ")
            )));
        }

        // presence checked above
        let required = |name: &str| get(name).unwrap_or_default();

        let jsonrpc_url = parse_url(JSONRPC_URL, &required(JSONRPC_URL))?;
        let injector_url = parse_url(INJECTOR_JSONRPC_URL, &required(INJECTOR_JSONRPC_URL))?;
        let private_key = PrivateKey::parse(&required(PRIVATE_KEY))?;

        let mut gas = GasOverride::default();
        if let Some(raw) = get(TRANSFER_GAS_PRICE) {
            gas.gas_price = parse_u256(TRANSFER_GAS_PRICE, &raw)?;
        }
        if let Some(raw) = get(TRANSFER_GAS_LIMIT) {
            gas.gas_limit = parse_u256(TRANSFER_GAS_LIMIT, &raw)?;
        }

        let rpc_timeout = match get(TRANSFER_RPC_TIMEOUT_SECS) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        };

        Ok(Self {
            jsonrpc_url,
            injector_url,
            private_key,
            gas,
            rpc_timeout,
        })
    }
}

fn parse_url(name: &str, raw: &str) -> TransferResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| TransferError::Config(format!("{} is not a valid URL: {}", name, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TransferError::Config(format!(
            "{} must use http or https, got {}",
            name, other
        ))),
    }
}

/// Parse a decimal or 0x-prefixed hex quantity
pub fn parse_u256(name: &str, raw: &str) -> TransferResult<U256> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(digits) => U256::from_str_radix(digits, 16).map_err(|e| e.to_string()),
        None => U256::from_dec_str(raw).map_err(|e| e.to_string()),
    };

    parsed.map_err(|e| TransferError::Config(format!("{} is not a valid quantity: {}", name, e)))
}

fn parse_timeout(raw: &str) -> TransferResult<Duration> {
    let secs: u64 = raw.trim().parse().map_err(|e| {
        TransferError::Config(format!("{} must be an integer: {}", TRANSFER_RPC_TIMEOUT_SECS, e))
    })?;
    if secs == 0 {
        return Err(TransferError::Config(format!(
            "{} must be greater than zero",
            TRANSFER_RPC_TIMEOUT_SECS
        )));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::tx::{DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE};
    use std::collections::HashMap;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn env_with(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = [
            (JSONRPC_URL, "http://127.0.0.1:8545"),
            (INJECTOR_JSONRPC_URL, "http://127.0.0.1:9545"),
            (PRIVATE_KEY, KEY),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in pairs {
            vars.insert(k.to_string(), v.to_string());
        }
        vars
    }

    fn load(vars: &HashMap<String, String>) -> TransferResult<Settings> {
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load(&env_with(&[])).unwrap();
        assert_eq!(settings.jsonrpc_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(settings.injector_url.as_str(), "http://127.0.0.1:9545/");
        assert_eq!(settings.gas.gas_price, DEFAULT_GAS_PRICE);
        assert_eq!(settings.gas.gas_limit, DEFAULT_GAS_LIMIT);
        assert_eq!(settings.rpc_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_each_missing_required_variable() {
        for name in REQUIRED {
            let mut vars = env_with(&[]);
            vars.remove(name);
            let err = load(&vars).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
            assert!(err.to_string().contains(name), "{}", err);
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = load(&env_with(&[(PRIVATE_KEY, "  ")])).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_all_missing_are_listed() {
        let err = load(&HashMap::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(JSONRPC_URL));
        assert!(msg.contains(INJECTOR_JSONRPC_URL));
        assert!(msg.contains(PRIVATE_KEY));
    }

    #[test]
    fn test_malformed_private_key() {
        assert!(load(&env_with(&[(PRIVATE_KEY, "0xzz")])).is_err());
        assert!(load(&env_with(&[(PRIVATE_KEY, "0x1234")])).is_err());
    }

    #[test]
    fn test_private_key_without_prefix() {
        let settings = load(&env_with(&[(PRIVATE_KEY, &KEY[2..])])).unwrap();
        assert_eq!(settings.private_key, PrivateKey::parse(KEY).unwrap());
    }

    #[test]
    fn test_private_key_is_redacted() {
        let settings = load(&env_with(&[])).unwrap();
        let printed = format!("{:?}", settings);
        assert!(!printed.contains(&KEY[2..]));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let err = load(&env_with(&[(JSONRPC_URL, "ws://127.0.0.1:8546")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(load(&env_with(&[(INJECTOR_JSONRPC_URL, "not a url")])).is_err());
    }

    #[test]
    fn test_gas_overrides_accept_hex_and_decimal() {
        let settings = load(&env_with(&[
            (TRANSFER_GAS_PRICE, "1000000000"),
            (TRANSFER_GAS_LIMIT, "0x5208"),
        ]))
        .unwrap();
        assert_eq!(settings.gas.gas_price, U256::from(1_000_000_000u64));
        assert_eq!(settings.gas.gas_limit, U256::from(21_000u64));

        assert!(load(&env_with(&[(TRANSFER_GAS_LIMIT, "lots")])).is_err());
    }

    #[test]
    fn test_timeout() {
        let settings = load(&env_with(&[(TRANSFER_RPC_TIMEOUT_SECS, "5")])).unwrap();
        assert_eq!(settings.rpc_timeout, Duration::from_secs(5));
        assert!(load(&env_with(&[(TRANSFER_RPC_TIMEOUT_SECS, "0")])).is_err());
        assert!(load(&env_with(&[(TRANSFER_RPC_TIMEOUT_SECS, "-1")])).is_err());
    }
}
