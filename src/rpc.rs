// src/rpc.rs
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::error::WalletError;

/// ERC20 Transfer event topic keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// balanceOf(address)
const BALANCE_OF_SELECTOR: &str = "70a08231";
/// transfer(address,uint256)
const TRANSFER_SELECTOR: &str = "a9059cbb";

#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    pub topics: Vec<String>,
    pub data: String,

    #[serde(rename = "blockNumber")]
    pub block_number_hex: String,

    #[serde(rename = "transactionHash")]
    pub tx_hash: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Receipt {
    #[serde(rename = "transactionHash")]
    pub tx_hash: String,

    #[serde(rename = "blockNumber")]
    pub block_number_hex: String,

    pub status: String,
}

/// Which indexed position of the Transfer event a history query filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicSlot {
    From,
    To,
}

/// Everything the wallet session needs from a JSON-RPC endpoint. The HTTP
/// implementation talks to a real node or wallet backend; tests script a mock.
#[async_trait]
pub trait EthereumRpc: Send + Sync {
    async fn block_number(&self) -> Result<u64, WalletError>;

    async fn transfer_logs(
        &self,
        contract: Address,
        from_block: u64,
        to_block: u64,
        slot: TopicSlot,
        account: Address,
    ) -> Result<Vec<Log>, WalletError>;

    async fn call(&self, to: Address, data: &str) -> Result<String, WalletError>;

    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: &str,
    ) -> Result<String, WalletError>;

    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<Receipt>, WalletError>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RpcResponse<T> {
    Success { result: T },
    Error { error: RpcErrorObject },
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

pub struct HttpRpc {
    client: Client,
    url: String,
}

impl HttpRpc {
    pub fn new(url: String) -> Result<Self, WalletError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self { client, url })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, WalletError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!("📡 {} → {}", method, self.url);

        let resp = self.client.post(&self.url).json(&payload).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(WalletError::Rpc(format!("HTTP {}", resp.status())));
        }

        let text = resp.text().await?;
        let parsed: RpcResponse<T> = serde_json::from_str(&text)?;
        match parsed {
            RpcResponse::Success { result } => Ok(result),
            // The error kind is decided here, where the node's answer lands.
            RpcResponse::Error { error } => Err(WalletError::from_rpc(error.code, error.message)),
        }
    }
}

#[async_trait]
impl EthereumRpc for HttpRpc {
    async fn block_number(&self) -> Result<u64, WalletError> {
        let result: String = self.request("eth_blockNumber", json!([])).await?;
        parse_hex_u64(&result)
    }

    async fn transfer_logs(
        &self,
        contract: Address,
        from_block: u64,
        to_block: u64,
        slot: TopicSlot,
        account: Address,
    ) -> Result<Vec<Log>, WalletError> {
        let account_topic = address_topic(account);
        let topics = match slot {
            TopicSlot::From => json!([TRANSFER_TOPIC, account_topic]),
            TopicSlot::To => json!([TRANSFER_TOPIC, Value::Null, account_topic]),
        };

        self.request(
            "eth_getLogs",
            json!([{
                "fromBlock": format!("0x{from_block:x}"),
                "toBlock": format!("0x{to_block:x}"),
                "address": contract.to_string(),
                "topics": topics
            }]),
        )
        .await
    }

    async fn call(&self, to: Address, data: &str) -> Result<String, WalletError> {
        self.request(
            "eth_call",
            json!([{ "to": to.to_string(), "data": data }, "latest"]),
        )
        .await
    }

    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        self.request("eth_requestAccounts", json!([])).await
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: &str,
    ) -> Result<String, WalletError> {
        self.request(
            "eth_sendTransaction",
            json!([{
                "from": from.to_string(),
                "to": to.to_string(),
                "data": data
            }]),
        )
        .await
    }

    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<Receipt>, WalletError> {
        self.request("eth_getTransactionReceipt", json!([tx_hash]))
            .await
    }
}

pub fn parse_hex_u64(s: &str) -> Result<u64, WalletError> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| WalletError::Rpc(format!("bad hex quantity {s}: {e}")))
}

/// An address left-padded to the 32 bytes of an indexed event topic.
pub fn address_topic(address: Address) -> String {
    format!("0x{:0>64}", hex::encode(address.as_slice()))
}

pub fn balance_of_calldata(owner: Address) -> String {
    format!(
        "0x{}{:0>64}",
        BALANCE_OF_SELECTOR,
        hex::encode(owner.as_slice())
    )
}

pub fn transfer_calldata(to: Address, value: U256) -> String {
    format!(
        "0x{}{:0>64}{:0>64}",
        TRANSFER_SELECTOR,
        hex::encode(to.as_slice()),
        format!("{value:x}")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOB: &str = "0x2222222222222222222222222222222222222222";

    #[test]
    fn success_envelope_deserializes() {
        let text = r#"{"jsonrpc":"2.0","id":1,"result":"0x10"}"#;
        let parsed: RpcResponse<String> = serde_json::from_str(text).unwrap();
        assert!(matches!(parsed, RpcResponse::Success { result } if result == "0x10"));
    }

    #[test]
    fn error_envelope_deserializes() {
        let text = r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"rejected"}}"#;
        let parsed: RpcResponse<String> = serde_json::from_str(text).unwrap();
        match parsed {
            RpcResponse::Error { error } => {
                assert_eq!(error.code, 4001);
                assert_eq!(error.message, "rejected");
            }
            RpcResponse::Success { .. } => panic!("expected error envelope"),
        }
    }

    #[test]
    fn null_result_is_absent_receipt() {
        let text = r#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        let parsed: RpcResponse<Option<Receipt>> = serde_json::from_str(text).unwrap();
        assert!(matches!(parsed, RpcResponse::Success { result: None }));
    }

    #[test]
    fn address_topic_is_left_padded() {
        let topic = address_topic(BOB.parse().unwrap());
        assert_eq!(topic.len(), 66);
        assert!(topic.starts_with("0x000000000000000000000000"));
        assert!(topic.ends_with("2222222222222222222222222222222222222222"));
    }

    #[test]
    fn transfer_calldata_layout() {
        let value = U256::from(5_000_000_000_000_000_000u128); // 5 RAK
        let data = transfer_calldata(BOB.parse().unwrap(), value);
        assert_eq!(data.len(), 2 + 8 + 64 + 64);
        assert!(data.starts_with("0xa9059cbb"));
        assert!(data.ends_with(
            "0000000000000000000000000000000000000000000000004563918244f40000"
        ));
    }

    #[test]
    fn balance_of_calldata_layout() {
        let data = balance_of_calldata(BOB.parse().unwrap());
        assert!(data.starts_with("0x70a08231"));
        assert!(data.ends_with("2222222222222222222222222222222222222222"));
        assert_eq!(data.len(), 2 + 8 + 64);
    }
}
