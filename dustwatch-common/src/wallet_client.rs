//! External wallet client interface
//!
//! The engine never talks to the ledger itself. UTXO snapshots, token
//! metadata and balances come from a [`WalletClient`]; signing and
//! broadcasting stay entirely on the client's side.
//!
//! [`SnapshotFile`] is a client backed by a JSON document, used by the CLI
//! and by tests.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::analytics::{AnalyticsRecord, StaticAnalytics};
use crate::classification::is_valid_token_id;
use crate::error::{DustwatchError, DustwatchResult, ErrorContext};
use crate::logging::{self, sanitize_for_logging, LogLevel};
use crate::types::RawUtxo;

/// Errors reported by a wallet client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletClientError {
    #[error("Wallet client unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Display metadata for a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub decimals: u8,
    #[serde(default)]
    pub protocol_tag: String,
}

/// Wallet balance split by confirmation state, in atoms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedBalance {
    pub confirmed: u64,
    pub unconfirmed: u64,
    pub total: u64,
}

impl DetailedBalance {
    /// Balance computed from a snapshot's plain-currency values
    pub fn from_utxos(utxos: &[RawUtxo]) -> Self {
        let mut balance = DetailedBalance::default();
        for utxo in utxos {
            if utxo.is_unconfirmed() {
                balance.unconfirmed = balance.unconfirmed.saturating_add(utxo.value_atoms);
            } else {
                balance.confirmed = balance.confirmed.saturating_add(utxo.value_atoms);
            }
        }
        balance.total = balance.confirmed.saturating_add(balance.unconfirmed);
        balance
    }
}

/// Read access to the wallet state the engine analyzes
pub trait WalletClient {
    /// Current unspent outputs of the wallet's address(es)
    fn utxo_snapshot(&self) -> Result<Vec<RawUtxo>, WalletClientError>;

    /// Display metadata for a token (best effort)
    fn token_metadata(&self, token_id: &str) -> Result<TokenMetadata, WalletClientError>;

    fn detailed_balance(&self) -> Result<DetailedBalance, WalletClientError>;
}

/// A token whose metadata could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentWarning {
    pub token_id: String,
    pub message: String,
}

impl fmt::Display for EnrichmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "token metadata unavailable for {}: {}",
            sanitize_for_logging(&self.token_id),
            self.message
        )
    }
}

/// Fill missing ticker, name, decimals and protocol of token attachments
///
/// Metadata is fetched once per token id. A failed fetch produces a warning
/// for that token and leaves its attachments untouched; the remaining tokens
/// are still processed.
pub fn enrich_token_metadata(
    utxos: &mut [RawUtxo],
    client: &dyn WalletClient,
) -> Vec<EnrichmentWarning> {
    let mut fetched: HashMap<String, Option<TokenMetadata>> = HashMap::new();
    let mut warnings = Vec::new();

    for utxo in utxos.iter_mut() {
        let attachment = match utxo.token_attachment.as_mut() {
            Some(attachment) if is_valid_token_id(&attachment.token_id) => attachment,
            _ => continue,
        };

        let needs_metadata = attachment.ticker.is_none()
            || attachment.name.is_none()
            || attachment.protocol_tag.is_empty();
        if !needs_metadata {
            continue;
        }

        let key = attachment.token_id.to_ascii_lowercase();
        let metadata = fetched.entry(key.clone()).or_insert_with(|| {
            match client.token_metadata(&key) {
                Ok(metadata) => Some(metadata),
                Err(e) => {
                    logging::log_enrichment(
                        LogLevel::Warn,
                        "token metadata lookup failed",
                        Some(json!({
                            "token_id": sanitize_for_logging(&key),
                            "error": e.to_string(),
                        })),
                    );
                    warnings.push(EnrichmentWarning {
                        token_id: key.clone(),
                        message: e.to_string(),
                    });
                    None
                }
            }
        });

        if let Some(metadata) = metadata {
            if attachment.ticker.is_none() {
                attachment.ticker = metadata.ticker.clone();
            }
            if attachment.name.is_none() {
                attachment.name = metadata.name.clone();
            }
            if attachment.protocol_tag.is_empty() {
                attachment.protocol_tag = metadata.protocol_tag.clone();
            }
            if attachment.decimals == 0 {
                attachment.decimals = metadata.decimals;
            }
        }
    }

    warnings
}

/// Wallet snapshot stored as a JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    /// Primary wallet address
    pub address: String,

    pub utxos: Vec<RawUtxo>,

    /// Balance as reported by the client; computed from `utxos` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<DetailedBalance>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub token_metadata: HashMap<String, TokenMetadata>,

    /// Precomputed per-output analytics
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub analytics: Vec<AnalyticsRecord>,
}

impl SnapshotFile {
    pub fn new(address: impl Into<String>, utxos: Vec<RawUtxo>) -> Self {
        Self {
            address: address.into(),
            utxos,
            balance: None,
            token_metadata: HashMap::new(),
            analytics: Vec::new(),
        }
    }

    pub fn from_json(text: &str) -> DustwatchResult<Self> {
        let snapshot: SnapshotFile = serde_json::from_str(text)?;
        Ok(snapshot)
    }

    /// Read a snapshot document from disk
    pub fn load(path: impl AsRef<Path>) -> DustwatchResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            DustwatchError::io(format!("Failed to read snapshot {}", path.display()), e)
        })?;
        let snapshot =
            Self::from_json(&text).context(format!("Invalid snapshot {}", path.display()))?;

        logging::log_enrichment(
            LogLevel::Debug,
            "snapshot loaded",
            Some(json!({
                "wallet": sanitize_for_logging(&snapshot.address),
                "outputs": snapshot.utxos.len(),
            })),
        );

        Ok(snapshot)
    }

    /// Analytics collaborator built from the stored records, if any
    pub fn analytics(&self) -> Option<StaticAnalytics> {
        if self.analytics.is_empty() {
            None
        } else {
            Some(StaticAnalytics::from_records(self.analytics.iter().cloned()))
        }
    }
}

impl WalletClient for SnapshotFile {
    fn utxo_snapshot(&self) -> Result<Vec<RawUtxo>, WalletClientError> {
        Ok(self.utxos.clone())
    }

    fn token_metadata(&self, token_id: &str) -> Result<TokenMetadata, WalletClientError> {
        self.token_metadata
            .get(token_id)
            .or_else(|| self.token_metadata.get(&token_id.to_ascii_lowercase()))
            .cloned()
            .ok_or_else(|| WalletClientError::NotFound(format!("token {}", token_id)))
    }

    fn detailed_balance(&self) -> Result<DetailedBalance, WalletClientError> {
        Ok(self
            .balance
            .unwrap_or_else(|| DetailedBalance::from_utxos(&self.utxos)))
    }
}
