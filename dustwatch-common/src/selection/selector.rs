//! Strategy selector
//!
//! Filters a classified snapshot down to the plain-currency outputs a
//! strategy allows to be spent. Token-bearing and mint-authority outputs are
//! removed first and unconditionally, so no strategy can ever hand a token
//! output to a currency-only transaction.

use serde_json::json;

use crate::config::ClassificationConfig;
use crate::logging::{self, LogLevel};
use crate::selection::types::{SelectionStats, SelectionWarning, SpendStrategy, StrategySelection};
use crate::types::ClassifiedUtxo;

/// Whether a plain-currency output passes the strategy's predicate
fn passes_strategy(
    utxo: &ClassifiedUtxo,
    strategy: SpendStrategy,
    config: &ClassificationConfig,
) -> bool {
    match strategy.min_value_exclusive(config) {
        Some(minimum) => utxo.value_atoms() > minimum,
        None => true,
    }
}

/// Select the outputs eligible to fund a transaction under `strategy`
pub fn select_for_strategy(
    utxos: &[ClassifiedUtxo],
    strategy: SpendStrategy,
    config: &ClassificationConfig,
) -> StrategySelection {
    let mut stats = SelectionStats {
        considered: utxos.len(),
        ..SelectionStats::default()
    };
    let mut selected = Vec::new();

    for utxo in utxos {
        if utxo.has_token() {
            stats.protected_tokens += 1;
        } else if utxo.is_pure_dust() {
            stats.excluded_dust += 1;
        } else if !passes_strategy(utxo, strategy, config) {
            stats.excluded_below_minimum += 1;
        } else {
            stats.selected_value_atoms = stats.selected_value_atoms.saturating_add(utxo.value_atoms());
            selected.push(utxo.clone());
        }
    }
    stats.eligible = selected.len();

    let warning = if selected.is_empty() {
        let warning = SelectionWarning {
            strategy,
            eligible: 0,
            protected_tokens: stats.protected_tokens,
            excluded_dust: stats.excluded_dust,
            excluded_below_minimum: stats.excluded_below_minimum,
        };
        logging::log_selection(LogLevel::Warn, &warning.to_string(), None);
        Some(warning)
    } else {
        logging::log_selection(
            LogLevel::Debug,
            "strategy selection complete",
            Some(json!({
                "strategy": strategy.as_str(),
                "eligible": stats.eligible,
                "protected_tokens": stats.protected_tokens,
                "excluded_dust": stats.excluded_dust,
            })),
        );
        None
    };

    StrategySelection {
        strategy,
        selected,
        stats,
        warning,
    }
}
