// src/parser.rs
use alloy::primitives::Address;

use crate::models::{Direction, TransferRecord};
use crate::rpc::Log;
use crate::units;

/// A decoded ERC20 Transfer event
#[derive(Debug, Clone)]
pub struct RawTransfer {
    pub from: Address,
    pub to: Address,
    pub value_u128: u128, // raw token units (assumes < 2^128 for simplicity)
    pub block_number: u64,
    pub tx_hash: String,
}

fn topic_to_address(topic: &str) -> Option<Address> {
    // topics[1] and topics[2] are 32-byte (padded) hex strings; address is the last 20 bytes
    let s = topic.trim_start_matches("0x");
    let bytes = hex::decode(s).ok()?;
    if bytes.len() != 32 {
        return None;
    }
    let addr_bytes: [u8; 20] = bytes[12..32].try_into().ok()?;
    Some(Address::from(addr_bytes))
}

/// Decode a single log into `RawTransfer`
pub fn decode_transfer(log: &Log) -> Option<RawTransfer> {
    if log.topics.len() < 3 {
        return None;
    }

    let from = topic_to_address(&log.topics[1])?;
    let to = topic_to_address(&log.topics[2])?;

    let value_hex = log.data.trim_start_matches("0x");
    let value_u128 = u128::from_str_radix(value_hex, 16).unwrap_or(0);

    let block_number =
        u64::from_str_radix(log.block_number_hex.trim_start_matches("0x"), 16).ok()?;

    Some(RawTransfer {
        from,
        to,
        value_u128,
        block_number,
        tx_hash: log.tx_hash.clone(),
    })
}

/// Orient a decoded transfer relative to the session account. Addresses are
/// compared as parsed bytes, so hex casing never changes the outcome.
pub fn to_record(transfer: &RawTransfer, account: Address) -> TransferRecord {
    let direction = if transfer.from == account {
        Direction::Sent
    } else {
        Direction::Received
    };

    TransferRecord {
        tx_hash: transfer.tx_hash.clone(),
        block_number: transfer.block_number,
        from: transfer.from.to_string(),
        to: transfer.to.to_string(),
        value: units::from_base_units(transfer.value_u128).to_string(),
        direction,
        submitted_at: None,
    }
}
