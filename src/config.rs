use alloy::primitives::Address;
use dotenvy::dotenv;
use eyre::{eyre, Result};
use std::env;

/// Raaskoin (RAK) token contract.
const DEFAULT_CONTRACT: &str = "0x7e88Fb6dC8E1Df1099e92a806cEfC58f5F466993";

#[derive(Debug, Clone)]
pub struct Config {
    pub wallet_rpc_url: Option<String>, // wallet-capable endpoint (accounts + signing)
    pub rpc_url: String,                // read-only fallback provider
    pub contract_address: Address,
    pub explorer_url: String,
    pub port: u16,
    pub confirm_poll_ms: u64,
    pub confirm_attempts: u32,
}

pub fn load() -> Result<Config> {
    dotenv().ok();

    // Wallet endpoint is optional; without it the session runs read-only and
    // connect() reports NoWalletDetected.
    let wallet_rpc_url = env::var("WALLET_RPC_URL")
        .ok()
        .filter(|s| !s.trim().is_empty());

    let rpc_url =
        env::var("RPC_URL").unwrap_or_else(|_| "https://rpc.xinfin.network".to_string());

    let contract_address = env::var("CONTRACT_ADDRESS")
        .unwrap_or_else(|_| DEFAULT_CONTRACT.to_string())
        .parse::<Address>()
        .map_err(|e| eyre!("invalid CONTRACT_ADDRESS: {e}"))?;

    let explorer_url = env::var("EXPLORER_URL")
        .unwrap_or_else(|_| "https://xdc.blocksscan.io".to_string());

    let port = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    // Confirmation wait: one receipt, polled at a fixed interval.
    let confirm_poll_ms = env::var("CONFIRM_POLL_MS")
        .unwrap_or_else(|_| "2000".to_string())
        .parse()
        .unwrap_or(2000);

    let confirm_attempts = env::var("CONFIRM_ATTEMPTS")
        .unwrap_or_else(|_| "30".to_string())
        .parse()
        .unwrap_or(30);

    Ok(Config {
        wallet_rpc_url,
        rpc_url,
        contract_address,
        explorer_url,
        port,
        confirm_poll_ms,
        confirm_attempts,
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wallet_rpc_url: None,
            rpc_url: "https://rpc.xinfin.network".to_string(),
            contract_address: DEFAULT_CONTRACT.parse().expect("default contract address"),
            explorer_url: "https://xdc.blocksscan.io".to_string(),
            port: 8080,
            confirm_poll_ms: 2000,
            confirm_attempts: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_contract_parses() {
        let config = Config::default();
        assert_eq!(
            config.contract_address.to_string().to_lowercase(),
            DEFAULT_CONTRACT.to_lowercase()
        );
    }

    #[test]
    fn default_is_read_only() {
        let config = Config::default();
        assert!(config.wallet_rpc_url.is_none());
    }
}
