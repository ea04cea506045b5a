// src/units.rs
use alloy::primitives::U256;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::error::WalletError;

/// Raaskoin uses the common 18-decimal layout.
const DECIMALS: u32 = 18;

/// Parse a user-entered display amount ("5", "0.25"). Negative and
/// non-numeric input is rejected before any chain interaction.
pub fn parse_amount(s: &str) -> Result<Decimal, WalletError> {
    let amount: Decimal = s
        .trim()
        .parse()
        .map_err(|_| WalletError::InvalidAmount(s.to_string()))?;
    if amount.is_sign_negative() {
        return Err(WalletError::InvalidAmount(s.to_string()));
    }
    Ok(amount)
}

/// Display units → smallest-unit integer (×10^18). Fails on more than 18
/// fractional digits or amounts too large for the transfer encoding.
pub fn to_base_units(amount: Decimal) -> Result<U256, WalletError> {
    let scaled = amount
        .checked_mul(Decimal::from(10u64.pow(DECIMALS)))
        .ok_or_else(|| WalletError::InvalidAmount(amount.to_string()))?;
    if !scaled.fract().is_zero() {
        return Err(WalletError::InvalidAmount(amount.to_string()));
    }
    let base = scaled
        .to_u128()
        .ok_or_else(|| WalletError::InvalidAmount(amount.to_string()))?;
    Ok(U256::from(base))
}

/// Smallest-unit integer → display units.
pub fn from_base_units(value: u128) -> Decimal {
    let raw = Decimal::from_u128(value).unwrap_or(Decimal::ZERO);
    (raw / Decimal::from(10u64.pow(DECIMALS))).normalize()
}
