//! Token extraction
//!
//! Turns the raw token attachment reported by the wallet client into a
//! validated [`TokenAttachment`]. Only a malformed token id means "no
//! token"; once the id is well formed the output stays token-bearing and bad
//! secondary fields fall back to zero. Extraction never fails.

use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

use crate::logging::{self, sanitize_for_logging, LogLevel};
use crate::types::{RawTokenAmount, RawUtxo, TokenAttachment, TOKEN_ID_HEX_LEN};

/// Whether `token_id` is a 64 character hex string
pub fn is_valid_token_id(token_id: &str) -> bool {
    token_id.len() == TOKEN_ID_HEX_LEN && hex::decode(token_id).is_ok()
}

/// Parse a raw token amount into integer atoms
///
/// Decimal strings must consist of ASCII digits only; signs, fractions and
/// exponents are rejected.
pub fn parse_token_amount(amount: &RawTokenAmount) -> Option<Decimal> {
    match amount {
        RawTokenAmount::Atoms(atoms) => Some(Decimal::from(*atoms)),
        RawTokenAmount::Text(text) => {
            let text = text.trim();
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Decimal::from_str(text).ok()
        }
    }
}

/// Extract validated token data from an output
///
/// Returns `None` when the output has no attachment or its token id is
/// malformed. An unparseable amount is recorded as zero atoms.
pub fn extract_token(utxo: &RawUtxo) -> Option<TokenAttachment> {
    let raw = utxo.token_attachment.as_ref()?;

    if !is_valid_token_id(&raw.token_id) {
        logging::log_classification(
            LogLevel::Warn,
            "ignoring token attachment with malformed token id",
            Some(json!({
                "outpoint": format!("{}:{}", sanitize_for_logging(&utxo.tx_id), utxo.output_index),
                "token_id_len": raw.token_id.len(),
            })),
        );
        return None;
    }

    let amount_atoms = match parse_token_amount(&raw.amount) {
        Some(amount) => amount,
        None => {
            logging::log_classification(
                LogLevel::Warn,
                "token amount unparseable, recording zero atoms",
                Some(json!({
                    "outpoint": format!("{}:{}", sanitize_for_logging(&utxo.tx_id), utxo.output_index),
                    "token_id": sanitize_for_logging(&raw.token_id),
                })),
            );
            Decimal::ZERO
        }
    };

    Some(TokenAttachment {
        token_id: raw.token_id.to_ascii_lowercase(),
        amount_atoms,
        is_mint_authority: raw.is_mint_authority,
        protocol_tag: raw.protocol_tag.clone(),
        decimals: raw.decimals,
        ticker: raw.ticker.clone().filter(|t| !t.trim().is_empty()),
        name: raw.name.clone().filter(|n| !n.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_id_must_be_64_hex_chars() {
        assert!(is_valid_token_id(&"ab".repeat(32)));
        assert!(is_valid_token_id(&"AB".repeat(32)));
        assert!(!is_valid_token_id(&"ab".repeat(31)));
        assert!(!is_valid_token_id(&"zz".repeat(32)));
        assert!(!is_valid_token_id(""));
    }

    #[test]
    fn amount_text_must_be_plain_digits() {
        assert_eq!(
            parse_token_amount(&RawTokenAmount::Text("1000".into())),
            Some(Decimal::from(1000u64))
        );
        assert_eq!(
            parse_token_amount(&RawTokenAmount::Text("340282366920938463463".into())),
            Decimal::from_str("340282366920938463463").ok()
        );
        assert_eq!(parse_token_amount(&RawTokenAmount::Text("-5".into())), None);
        assert_eq!(parse_token_amount(&RawTokenAmount::Text("1.5".into())), None);
        assert_eq!(parse_token_amount(&RawTokenAmount::Text("abc".into())), None);
        assert_eq!(parse_token_amount(&RawTokenAmount::Text("".into())), None);
    }

    #[test]
    fn bad_amount_keeps_the_token() {
        let utxo = RawUtxo::new("00".repeat(32), 0, 2_000).with_token(
            crate::types::RawTokenAttachment::new("cd".repeat(32), "12.5"),
        );

        let token = extract_token(&utxo).expect("id is well formed");
        assert_eq!(token.amount_atoms, Decimal::ZERO);
    }
}
