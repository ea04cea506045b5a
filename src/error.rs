use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// EIP-1193 "user rejected request" error code.
const USER_REJECTED_CODE: i64 = 4001;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("No wallet endpoint detected")]
    NoWalletDetected,

    #[error("Wallet request rejected by user")]
    UserRejected,

    #[error("No wallet connected")]
    NotConnected,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("A transfer is already in flight")]
    TransferInFlight,

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transfer reverted: {0}")]
    Reverted(String),

    #[error("Timed out waiting for confirmation")]
    ConfirmationTimeout,

    #[error("QR scan error: {0}")]
    QrScan(String),
}

impl WalletError {
    /// Classify a JSON-RPC error object where it is received, so callers
    /// can tell a rejected signature from a reverted call from a node fault.
    pub fn from_rpc(code: i64, message: String) -> Self {
        if code == USER_REJECTED_CODE {
            WalletError::UserRejected
        } else if message.to_lowercase().contains("revert") {
            WalletError::Reverted(message)
        } else {
            WalletError::Rpc(message)
        }
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(e: reqwest::Error) -> Self {
        WalletError::Rpc(e.to_string())
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(e: serde_json::Error) -> Self {
        WalletError::Rpc(format!("malformed RPC response: {e}"))
    }
}

impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        let status = match self {
            WalletError::NoWalletDetected => StatusCode::SERVICE_UNAVAILABLE,
            WalletError::UserRejected => StatusCode::FORBIDDEN,
            WalletError::NotConnected
            | WalletError::MissingField(_)
            | WalletError::InvalidRecipient(_)
            | WalletError::InvalidAmount(_)
            | WalletError::QrScan(_) => StatusCode::BAD_REQUEST,
            WalletError::TransferInFlight => StatusCode::CONFLICT,
            WalletError::Reverted(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WalletError::ConfirmationTimeout => StatusCode::GATEWAY_TIMEOUT,
            WalletError::Rpc(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
