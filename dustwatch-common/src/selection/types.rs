//! Core types for strategy-based input selection
//!
//! - [`SpendStrategy`]: the closed set of spending policies
//! - [`StrategySelection`]: the eligible inputs plus exclusion counts
//! - [`SelectionWarning`]: structured "nothing eligible" diagnostic

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::ClassificationConfig;
use crate::types::ClassifiedUtxo;

/// Policy controlling which plain-currency outputs may fund a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendStrategy {
    /// Any non-dust output; fewest inputs and lowest fee overhead
    Efficient,
    /// Non-dust outputs above the privacy minimum; avoids linkable change
    Privacy,
    /// Non-dust outputs above the security minimum; resists dust attacks
    Security,
}

impl SpendStrategy {
    pub const ALL: [SpendStrategy; 3] = [
        SpendStrategy::Efficient,
        SpendStrategy::Privacy,
        SpendStrategy::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpendStrategy::Efficient => "efficient",
            SpendStrategy::Privacy => "privacy",
            SpendStrategy::Security => "security",
        }
    }

    /// Exclusive lower bound on value, beyond the dust exclusion
    pub fn min_value_exclusive(&self, config: &ClassificationConfig) -> Option<u64> {
        match self {
            SpendStrategy::Efficient => None,
            SpendStrategy::Privacy => Some(config.privacy_min_value),
            SpendStrategy::Security => Some(config.security_min_value),
        }
    }
}

impl fmt::Display for SpendStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for strategy names outside the closed set
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StrategyParseError {
    #[error("Unknown spending strategy '{0}' (expected efficient, privacy or security)")]
    Unknown(String),
}

impl FromStr for SpendStrategy {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "efficient" => Ok(SpendStrategy::Efficient),
            "privacy" => Ok(SpendStrategy::Privacy),
            "security" => Ok(SpendStrategy::Security),
            _ => Err(StrategyParseError::Unknown(s.to_string())),
        }
    }
}

/// Why outputs were left out of a selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionStats {
    pub considered: usize,
    pub eligible: usize,
    /// Token-bearing and mint-authority outputs, always excluded
    pub protected_tokens: usize,
    pub excluded_dust: usize,
    /// Plain outputs at or below the strategy's minimum value
    pub excluded_below_minimum: usize,
    pub selected_value_atoms: u64,
}

/// Raised when a strategy leaves nothing to spend
///
/// Deciding whether to fall back to an unfiltered set is left to the wallet
/// client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionWarning {
    pub strategy: SpendStrategy,
    pub eligible: usize,
    pub protected_tokens: usize,
    pub excluded_dust: usize,
    pub excluded_below_minimum: usize,
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no suitable UTXOs for strategy {} (eligible={}, protectedTokens={}, excludedDust={}, belowMinimum={})",
            self.strategy,
            self.eligible,
            self.protected_tokens,
            self.excluded_dust,
            self.excluded_below_minimum
        )
    }
}

/// Result of a strategy selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategySelection {
    pub strategy: SpendStrategy,
    /// Eligible outputs in input order
    pub selected: Vec<ClassifiedUtxo>,
    pub stats: SelectionStats,
    pub warning: Option<SelectionWarning>,
}

impl StrategySelection {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn values(&self) -> Vec<u64> {
        self.selected.iter().map(|u| u.value_atoms()).collect()
    }
}
