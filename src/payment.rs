// src/payment.rs
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::error::WalletError;

/// Lifecycle of one submission. There is no retry from Failed and no
/// cancellation once Submitting has begun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPhase {
    Validating,
    Submitting,
    Confirming,
    Succeeded,
    Failed,
}

impl fmt::Display for PaymentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentPhase::Validating => "validating",
            PaymentPhase::Submitting => "submitting",
            PaymentPhase::Confirming => "confirming",
            PaymentPhase::Succeeded => "succeeded",
            PaymentPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

pub fn enter(phase: PaymentPhase) {
    info!("Payment {phase}");
}

/// Single-slot in-flight flag: at most one transfer at a time, later
/// attempts rejected until the active one resolves.
#[derive(Debug, Default)]
pub struct TransferSlot {
    busy: AtomicBool,
}

impl TransferSlot {
    pub fn acquire(&self) -> Result<SlotGuard<'_>, WalletError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            return Err(WalletError::TransferInFlight);
        }
        Ok(SlotGuard { slot: self })
    }
}

pub struct SlotGuard<'a> {
    slot: &'a TransferSlot,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.slot.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_rejected_while_held() {
        let slot = TransferSlot::default();
        let guard = slot.acquire().unwrap();
        assert!(matches!(
            slot.acquire(),
            Err(WalletError::TransferInFlight)
        ));
        drop(guard);
        assert!(slot.acquire().is_ok());
    }
}
