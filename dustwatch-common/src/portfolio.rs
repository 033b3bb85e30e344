//! Portfolio aggregation
//!
//! Folds a classified snapshot into counts by type and health, plain-value
//! totals and per-token holdings, in a single pass.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{ClassifiedUtxo, HealthStatus, UtxoType};

/// Aggregate view of one token held by the wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub token_id: String,
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub protocol_tag: String,
    pub decimals: u8,
    /// Outputs carrying this token (mint authorities included)
    pub utxo_count: usize,
    pub mint_authority_count: usize,
    /// Sum of token amounts in atoms
    pub total_atoms: Decimal,
    /// Plain-currency value locked in outputs carrying this token
    pub locked_value_atoms: u64,
}

impl TokenHolding {
    fn new(token_id: &str) -> Self {
        Self {
            token_id: token_id.to_string(),
            ticker: None,
            name: None,
            protocol_tag: String::new(),
            decimals: 0,
            utxo_count: 0,
            mint_authority_count: 0,
            total_atoms: Decimal::ZERO,
            locked_value_atoms: 0,
        }
    }

    /// Total amount scaled by `decimals` for display
    pub fn display_amount(&self) -> Option<Decimal> {
        let mut amount = self.total_atoms;
        amount.set_scale(u32::from(self.decimals)).ok()?;
        Some(amount.normalize())
    }
}

/// Summary counts over a classified snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_utxos: usize,
    /// Count per type; every type is present, possibly with zero
    pub by_type: BTreeMap<UtxoType, usize>,
    /// Count per classification health; every status is present
    pub by_health: BTreeMap<HealthStatus, usize>,
    pub token_utxos: usize,
    pub unique_token_ids: usize,
    pub mint_authority_count: usize,
    /// Plain value of every output, token-bearing ones included
    pub total_value_atoms: u64,
    /// Plain value of outputs without tokens
    pub plain_value_atoms: u64,
    /// Plain value of outputs a currency-only transaction may spend
    pub spendable_value_atoms: u64,
    /// One entry per token id, ordered by token id
    pub token_holdings: Vec<TokenHolding>,
}

impl PortfolioSummary {
    pub fn count(&self, utxo_type: UtxoType) -> usize {
        self.by_type.get(&utxo_type).copied().unwrap_or(0)
    }

    pub fn health_count(&self, status: HealthStatus) -> usize {
        self.by_health.get(&status).copied().unwrap_or(0)
    }
}

/// Aggregate a classified snapshot
pub fn aggregate(utxos: &[ClassifiedUtxo]) -> PortfolioSummary {
    let mut by_type: BTreeMap<UtxoType, usize> = UtxoType::ALL.iter().map(|t| (*t, 0)).collect();
    let mut by_health: BTreeMap<HealthStatus, usize> =
        HealthStatus::ALL.iter().map(|s| (*s, 0)).collect();
    // Keyed by token id, so its length is the unique token count
    let mut holdings: BTreeMap<String, TokenHolding> = BTreeMap::new();

    let mut token_utxos = 0;
    let mut mint_authority_count = 0;
    let mut total_value_atoms: u64 = 0;
    let mut plain_value_atoms: u64 = 0;
    let mut spendable_value_atoms: u64 = 0;

    for utxo in utxos {
        *by_type.entry(utxo.utxo_type()).or_insert(0) += 1;
        *by_health.entry(utxo.health().status).or_insert(0) += 1;

        let value = utxo.value_atoms();
        total_value_atoms = total_value_atoms.saturating_add(value);

        match utxo.token() {
            Some(token) => {
                token_utxos += 1;
                if token.is_mint_authority {
                    mint_authority_count += 1;
                }

                let holding = holdings
                    .entry(token.token_id.clone())
                    .or_insert_with(|| TokenHolding::new(&token.token_id));
                holding.utxo_count += 1;
                holding.locked_value_atoms = holding.locked_value_atoms.saturating_add(value);
                if token.is_mint_authority {
                    holding.mint_authority_count += 1;
                }
                holding.total_atoms = holding
                    .total_atoms
                    .checked_add(token.amount_atoms)
                    .unwrap_or(Decimal::MAX);
                if holding.ticker.is_none() {
                    holding.ticker = token.ticker.clone();
                }
                if holding.name.is_none() {
                    holding.name = token.name.clone();
                }
                if holding.protocol_tag.is_empty() {
                    holding.protocol_tag = token.protocol_tag.clone();
                }
                holding.decimals = holding.decimals.max(token.decimals);
            }
            None => {
                plain_value_atoms = plain_value_atoms.saturating_add(value);
                if !utxo.is_pure_dust() {
                    spendable_value_atoms = spendable_value_atoms.saturating_add(value);
                }
            }
        }
    }

    PortfolioSummary {
        total_utxos: utxos.len(),
        by_type,
        by_health,
        token_utxos,
        unique_token_ids: holdings.len(),
        mint_authority_count,
        total_value_atoms,
        plain_value_atoms,
        spendable_value_atoms,
        token_holdings: holdings.into_values().collect(),
    }
}
