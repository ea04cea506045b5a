use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use alloy::primitives::Address;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::WalletError;
use crate::history::History;
use crate::models::{Direction, TransferRecord, TransferRequest};
use crate::parser;
use crate::payment::{self, PaymentPhase, TransferSlot};
use crate::rpc::{self, EthereumRpc, Receipt, TopicSlot};
use crate::units;

/// Blocks scanned when rebuilding history. Transfers older than this
/// window are not shown.
const HISTORY_LOOKBACK: u64 = 10_000;

/// One wallet session per running service. Owns the provider handle, the
/// connected account and the in-memory history; every operation goes
/// through an explicit `&Session` rather than ambient globals.
pub struct Session {
    rpc: Arc<dyn EthereumRpc>,
    wallet_capable: bool,
    contract: Address,
    explorer_url: String,
    account: RwLock<Option<Address>>,
    history: Mutex<History>,
    transfer_slot: TransferSlot,
    confirm_poll: Duration,
    confirm_attempts: u32,
}

impl Session {
    pub fn new(rpc: Arc<dyn EthereumRpc>, wallet_capable: bool, cfg: &Config) -> Self {
        Self {
            rpc,
            wallet_capable,
            contract: cfg.contract_address,
            explorer_url: cfg.explorer_url.clone(),
            account: RwLock::new(None),
            history: Mutex::new(History::default()),
            transfer_slot: TransferSlot::default(),
            confirm_poll: Duration::from_millis(cfg.confirm_poll_ms),
            confirm_attempts: cfg.confirm_attempts,
        }
    }

    pub fn account(&self) -> Option<Address> {
        *self.account.read().unwrap()
    }

    pub fn explorer_url(&self) -> &str {
        &self.explorer_url
    }

    fn require_account(&self) -> Result<Address, WalletError> {
        self.account().ok_or(WalletError::NotConnected)
    }

    /// Request account access from the wallet endpoint. The first
    /// authorized address becomes the active account.
    pub async fn connect(&self) -> Result<Address, WalletError> {
        if !self.wallet_capable {
            return Err(WalletError::NoWalletDetected);
        }

        let accounts = self.rpc.request_accounts().await?;
        let first = accounts.first().ok_or(WalletError::NoWalletDetected)?;
        let address: Address = first.parse().map_err(|_| {
            WalletError::Rpc(format!("wallet returned malformed account {first}"))
        })?;

        *self.account.write().unwrap() = Some(address);
        info!("Wallet connected: {address}");
        Ok(address)
    }

    /// Current token balance of the connected account, in display units.
    pub async fn balance(&self) -> Result<Decimal, WalletError> {
        let account = self.require_account()?;

        let data = rpc::balance_of_calldata(account);
        let raw = self.rpc.call(self.contract, &data).await?;
        let value = u128::from_str_radix(raw.trim_start_matches("0x"), 16)
            .map_err(|e| WalletError::Rpc(format!("bad balanceOf result {raw}: {e}")))?;

        Ok(units::from_base_units(value))
    }

    /// Rebuild history from the chain: two directional Transfer queries
    /// over the lookback window, merged newest-first. Both queries must
    /// succeed; a partial view is never returned.
    pub async fn sync_history(&self) -> Result<Vec<TransferRecord>, WalletError> {
        let account = self.require_account()?;

        let latest = self.rpc.block_number().await?;
        let from_block = latest.saturating_sub(HISTORY_LOOKBACK);

        let sent = self
            .rpc
            .transfer_logs(self.contract, from_block, latest, TopicSlot::From, account)
            .await?;
        let received = self
            .rpc
            .transfer_logs(self.contract, from_block, latest, TopicSlot::To, account)
            .await?;

        let mut records: Vec<TransferRecord> = sent
            .iter()
            .chain(received.iter())
            .filter_map(parser::decode_transfer)
            .map(|t| parser::to_record(&t, account))
            .collect();
        // Stable sort: equal blocks keep sent-query results first.
        records.sort_by_key(|r| std::cmp::Reverse(r.block_number));

        info!(
            "History sync: {} records over blocks {} → {}",
            records.len(),
            from_block,
            latest
        );

        let mut history = self.history.lock().unwrap();
        history.apply_sync(records);
        Ok(history.snapshot())
    }

    /// Submit a token transfer and wait for one confirmation. At most one
    /// transfer is in flight at a time; a second call is rejected until
    /// the active one resolves.
    pub async fn send_payment(
        &self,
        req: &TransferRequest,
    ) -> Result<TransferRecord, WalletError> {
        let _slot = self.transfer_slot.acquire()?;

        match self.submit_transfer(req).await {
            Ok(record) => {
                payment::enter(PaymentPhase::Succeeded);
                info!("Payment confirmed: {}", record.tx_hash);
                Ok(record)
            }
            Err(e) => {
                payment::enter(PaymentPhase::Failed);
                warn!("Payment failed: {e}");
                Err(e)
            }
        }
    }

    async fn submit_transfer(
        &self,
        req: &TransferRequest,
    ) -> Result<TransferRecord, WalletError> {
        payment::enter(PaymentPhase::Validating);
        let account = self.require_account()?;
        if req.recipient.trim().is_empty() {
            return Err(WalletError::MissingField("recipient"));
        }
        if req.amount.trim().is_empty() {
            return Err(WalletError::MissingField("amount"));
        }
        let recipient: Address = req
            .recipient
            .trim()
            .parse()
            .map_err(|_| WalletError::InvalidRecipient(req.recipient.clone()))?;
        let amount = units::parse_amount(&req.amount)?;
        let value = units::to_base_units(amount)?;

        payment::enter(PaymentPhase::Submitting);
        let data = rpc::transfer_calldata(recipient, value);
        let tx_hash = self
            .rpc
            .send_transaction(account, self.contract, &data)
            .await?;
        info!("Transfer submitted: {tx_hash}");

        payment::enter(PaymentPhase::Confirming);
        let receipt = self.wait_for_receipt(&tx_hash).await?;
        if receipt.status == "0x0" {
            return Err(WalletError::Reverted(format!(
                "transaction {tx_hash} reverted"
            )));
        }

        let record = TransferRecord {
            tx_hash: receipt.tx_hash.clone(),
            block_number: rpc::parse_hex_u64(&receipt.block_number_hex)?,
            from: account.to_string(),
            to: recipient.to_string(),
            value: amount.normalize().to_string(),
            direction: Direction::Sent,
            submitted_at: Some(Utc::now()),
        };

        // Provisional until a sync reports the same hash.
        self.history.lock().unwrap().append_provisional(record.clone());
        Ok(record)
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<Receipt, WalletError> {
        for _ in 0..self.confirm_attempts {
            if let Some(receipt) = self.rpc.transaction_receipt(tx_hash).await? {
                return Ok(receipt);
            }
            tokio::time::sleep(self.confirm_poll).await;
        }
        Err(WalletError::ConfirmationTimeout)
    }
}
