// Standalone probe: fetch recent Raaskoin Transfer activity for one address
// straight from an RPC endpoint, without going through the wallet service.
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::env;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RpcResponse<T> {
    Success { result: T },
    Error { error: RpcError },
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct Log {
    topics: Vec<String>,

    data: String,

    #[serde(rename = "blockNumber")]
    block_number: String,

    #[serde(rename = "transactionHash")]
    tx_hash: String,
}

const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
const LOOKBACK_BLOCKS: u64 = 10_000;

fn decode_address(topic: &str) -> String {
    if topic.len() >= 66 {
        format!("0x{}", &topic[26..])
    } else {
        topic.to_string()
    }
}

fn decode_uint256(data: &str) -> u128 {
    u128::from_str_radix(data.trim_start_matches("0x"), 16).unwrap_or(0)
}

fn address_topic(address: &str) -> String {
    format!("0x{:0>64}", address.trim_start_matches("0x"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let rpc_url =
        env::var("RPC_URL").unwrap_or_else(|_| "https://rpc.xinfin.network".to_string());
    let contract = env::var("CONTRACT_ADDRESS")
        .unwrap_or_else(|_| "0x7e88Fb6dC8E1Df1099e92a806cEfC58f5F466993".to_string());
    let account = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: probe_logs <0x-address>"))?;

    let client = Client::new();
    println!("Probing Raaskoin transfers for {account}...");

    // latest block
    let block_res: RpcResponse<String> = client
        .post(&rpc_url)
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_blockNumber",
            "params": []
        }))
        .send()
        .await?
        .json()
        .await?;

    let latest_hex = match block_res {
        RpcResponse::Success { result } => result,
        RpcResponse::Error { error } => {
            eprintln!("RPC error {} fetching block: {}", error.code, error.message);
            return Ok(());
        }
    };

    let latest = u64::from_str_radix(latest_hex.trim_start_matches("0x"), 16)?;
    let from_block = latest.saturating_sub(LOOKBACK_BLOCKS);
    println!("Scanning blocks {from_block} → {latest}");

    // one query per indexed position, same as the service's history sync
    for (label, topics) in [
        ("sent", json!([TRANSFER_TOPIC, address_topic(&account)])),
        (
            "received",
            json!([TRANSFER_TOPIC, serde_json::Value::Null, address_topic(&account)]),
        ),
    ] {
        let logs_res: RpcResponse<Vec<Log>> = client
            .post(&rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_getLogs",
                "params": [{
                    "fromBlock": format!("0x{from_block:x}"),
                    "toBlock": format!("0x{latest:x}"),
                    "address": contract.as_str(),
                    "topics": topics
                }]
            }))
            .send()
            .await?
            .json()
            .await?;

        match logs_res {
            RpcResponse::Success { result: logs } => {
                println!("{label}: {} logs", logs.len());
                for log in logs.iter().take(5) {
                    let from = decode_address(&log.topics[1]);
                    let to = decode_address(&log.topics[2]);
                    let value = decode_uint256(&log.data);

                    println!(
                        "  Tx: {} | Block: {} | From: {} | To: {} | Value: {}",
                        log.tx_hash, log.block_number, from, to, value
                    );
                }
            }
            RpcResponse::Error { error } => {
                eprintln!(
                    "RPC error {} fetching {label} logs: {}",
                    error.code, error.message
                );
            }
        }
    }

    Ok(())
}
