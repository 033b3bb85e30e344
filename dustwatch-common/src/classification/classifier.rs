//! Per-output classification
//!
//! [`classify`] is total and depends only on the output itself, so the
//! result for a given `(tx_id, output_index)` never changes for a fixed
//! configuration.

use serde_json::json;

use crate::classification::token::extract_token;
use crate::config::ClassificationConfig;
use crate::logging::{self, LogLevel};
use crate::types::{
    ClassifiedUtxo, HealthAssessment, HealthStatus, RawUtxo, TokenAttachment, UtxoType,
};

/// Determine the type of an output from its value and validated token data
///
/// Token data wins over value: a token-bearing output is never dust, whatever
/// its plain-currency value.
pub fn determine_type(
    value_atoms: u64,
    token: Option<&TokenAttachment>,
    config: &ClassificationConfig,
) -> UtxoType {
    match token {
        Some(token) if token.is_mint_authority => UtxoType::MintAuthority,
        Some(_) => UtxoType::TokenBearing,
        None if value_atoms <= config.dust_threshold => UtxoType::PureDust,
        None if value_atoms <= config.change_like_ceiling() => UtxoType::ChangeLike,
        None if value_atoms >= config.large_threshold => UtxoType::Large,
        None => UtxoType::Standard,
    }
}

/// Default health assessment for an output type
pub fn assess_health(
    utxo_type: UtxoType,
    value_atoms: u64,
    config: &ClassificationConfig,
) -> HealthAssessment {
    match utxo_type {
        UtxoType::PureDust => HealthAssessment::new(
            HealthStatus::Dust,
            format!(
                "Plain value of {} atoms is at or below the dust threshold of {}",
                value_atoms, config.dust_threshold
            ),
        ),
        UtxoType::TokenBearing => HealthAssessment::new(
            HealthStatus::Healthy,
            "Carries token value; plain-currency value is not meaningful",
        ),
        UtxoType::MintAuthority => HealthAssessment::new(
            HealthStatus::Healthy,
            "Holds token mint authority",
        ),
        UtxoType::ChangeLike => HealthAssessment::new(
            HealthStatus::Healthy,
            format!("Small value of {} atoms, typical of change", value_atoms),
        ),
        UtxoType::Large => HealthAssessment::new(
            HealthStatus::Healthy,
            format!("Large value of {} atoms", value_atoms),
        ),
        UtxoType::Standard => HealthAssessment::new(HealthStatus::Healthy, "Standard output"),
    }
}

/// Classify a single output
pub fn classify(utxo: &RawUtxo, config: &ClassificationConfig) -> ClassifiedUtxo {
    let token = extract_token(utxo);
    let utxo_type = determine_type(utxo.value_atoms, token.as_ref(), config);
    let health = assess_health(utxo_type, utxo.value_atoms, config);

    ClassifiedUtxo {
        utxo: utxo.clone(),
        token,
        utxo_type,
        health,
        is_pure_dust: utxo_type == UtxoType::PureDust,
        has_token: utxo_type.is_token(),
    }
}

/// Classify every output of a snapshot, preserving order
pub fn classify_all(utxos: &[RawUtxo], config: &ClassificationConfig) -> Vec<ClassifiedUtxo> {
    let classified: Vec<ClassifiedUtxo> = utxos.iter().map(|u| classify(u, config)).collect();

    logging::log_classification(
        LogLevel::Debug,
        "classified snapshot",
        Some(json!({
            "outputs": classified.len(),
            "token_outputs": classified.iter().filter(|c| c.has_token()).count(),
            "pure_dust": classified.iter().filter(|c| c.is_pure_dust()).count(),
        })),
    );

    classified
}
