// src/qr.rs
use alloy::primitives::Address;
use qrcode::render::unicode;
use qrcode::QrCode;

use crate::error::WalletError;

/// Payment target for QR display, EIP-681 basic form.
pub fn payment_uri(address: Address) -> String {
    format!("ethereum:{address}")
}

/// Render a payload as terminal-friendly QR art.
pub fn render_qr(payload: &str) -> Result<String, WalletError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| WalletError::QrScan(e.to_string()))?;
    Ok(code.render::<unicode::Dense1x2>().quiet_zone(true).build())
}

/// Interpret a scanned payload as a recipient address. Accepts a bare 0x
/// address or an ethereum: URI; chain-id and query suffixes are ignored.
pub fn parse_scanned(payload: &str) -> Result<Address, WalletError> {
    let trimmed = payload.trim();
    let target = trimmed.strip_prefix("ethereum:").unwrap_or(trimmed);
    let target = target
        .split(|c| c == '?' || c == '@')
        .next()
        .unwrap_or(target);

    target
        .parse()
        .map_err(|_| WalletError::QrScan(format!("not a wallet address: {payload}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x1111111111111111111111111111111111111111";

    #[test]
    fn bare_address_parses() {
        let address = parse_scanned(" 0x1111111111111111111111111111111111111111 ").unwrap();
        assert_eq!(address, ALICE.parse::<Address>().unwrap());
    }

    #[test]
    fn payment_uri_round_trips() {
        let address: Address = ALICE.parse().unwrap();
        let uri = payment_uri(address);
        assert!(uri.starts_with("ethereum:0x"));
        assert_eq!(parse_scanned(&uri).unwrap(), address);
    }

    #[test]
    fn uri_suffixes_are_ignored() {
        let address = parse_scanned(
            "ethereum:0x1111111111111111111111111111111111111111@50?value=1",
        )
        .unwrap();
        assert_eq!(address, ALICE.parse::<Address>().unwrap());
    }

    #[test]
    fn garbage_payload_rejected() {
        assert!(matches!(
            parse_scanned("https://example.com/not-an-address"),
            Err(WalletError::QrScan(_))
        ));
    }

    #[test]
    fn renders_qr_art() {
        let art = render_qr(&payment_uri(ALICE.parse().unwrap())).unwrap();
        assert!(!art.is_empty());
        assert!(art.lines().count() > 10);
    }
}
