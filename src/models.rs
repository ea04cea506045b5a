// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Sent,
    Received,
}

/// A recipient/amount pair as entered by the user, validated right before
/// submission and discarded after.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    pub recipient: String,
    pub amount: String,
}

/// One row of transfer history.
#[derive(Debug, Clone, Serialize)]
pub struct TransferRecord {
    pub tx_hash: String,
    pub block_number: u64,
    pub from: String,
    pub to: String,
    pub value: String, // display units, decimal string
    pub direction: Direction,

    // Set only on locally-submitted transfers; synced records carry None.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl TransferRecord {
    /// Block-explorer link for this transfer. Constructed, never parsed.
    pub fn explorer_link(&self, explorer_url: &str) -> String {
        format!("{}/tx/{}", explorer_url.trim_end_matches('/'), self.tx_hash)
    }
}
