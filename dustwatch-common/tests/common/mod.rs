//! Shared builders for dustwatch-common integration tests

#![allow(dead_code)]

use dustwatch_common::classification::classify_all;
use dustwatch_common::config::ClassificationConfig;
use dustwatch_common::logging::{self, LogConfig, LogLevel};
use dustwatch_common::types::{ClassifiedUtxo, RawTokenAttachment, RawUtxo};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

pub const WALLET: &str = "ecash:qz2708636snqhsxu8wnlka78h6fdp77ar59jrf5035";

pub const CONFIRMED_HEIGHT: u32 = 800_000;

pub fn setup() {
    INIT_LOGGER.call_once(|| {
        let config = LogConfig {
            level: LogLevel::Error,
            log_file: None,
            include_timestamps: false,
            include_source_location: false,
            json_format: false,
        };
        let _ = logging::init(&config);
    });
}

/// Deterministic 64-char transaction id
pub fn tx_id(n: u32) -> String {
    format!("{:064x}", n)
}

/// Deterministic 64-char token id
pub fn token_id(n: u8) -> String {
    format!("{:02x}", n).repeat(32)
}

/// Confirmed plain-currency output
pub fn plain(n: u32, value: u64) -> RawUtxo {
    RawUtxo::new(tx_id(n), 0, value).with_confirmation_height(CONFIRMED_HEIGHT)
}

/// Confirmed plain-currency outputs, one per value
pub fn plain_utxos(values: &[u64]) -> Vec<RawUtxo> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| plain(i as u32, *value))
        .collect()
}

/// Confirmed output carrying `amount` atoms of token `token`
pub fn token_utxo(n: u32, value: u64, token: u8, amount: u64) -> RawUtxo {
    plain(n, value).with_token(RawTokenAttachment::new(token_id(token), amount).with_protocol("ALP"))
}

/// Confirmed output holding the mint authority of token `token`
pub fn mint_utxo(n: u32, value: u64, token: u8) -> RawUtxo {
    plain(n, value).with_token(
        RawTokenAttachment::new(token_id(token), 0u64)
            .mint_authority()
            .with_protocol("ALP"),
    )
}

pub fn classify_default(utxos: &[RawUtxo]) -> Vec<ClassifiedUtxo> {
    classify_all(utxos, &ClassificationConfig::default())
}

pub fn classify_values(values: &[u64]) -> Vec<ClassifiedUtxo> {
    classify_default(&plain_utxos(values))
}
