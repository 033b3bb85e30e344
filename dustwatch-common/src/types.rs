//! Common data types for the Dustwatch engine
//!
//! These types describe a wallet's unspent outputs as they arrive from the
//! external wallet client ([`RawUtxo`]) and as they leave the classifier
//! ([`ClassifiedUtxo`]). They are plain data: serializable, cloneable and
//! free of any ledger or network handles.
//!
//! # Amounts
//!
//! All plain-currency values are integer atoms (`u64`). Token amounts are
//! integer atoms held as [`rust_decimal::Decimal`] because some token
//! protocols carry amounts wider than 64 bits. Floating point is never used
//! for classification or comparison.

use log::warn;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// Constants for ledger-specific values

/// Plain-currency value at or below which an output is considered dust
pub const DUST_THRESHOLD: u64 = 546;

/// Plain-currency value at or above which an output is considered large
pub const LARGE_THRESHOLD: u64 = 10_000;

/// Length of a well-formed token identifier in hex characters
pub const TOKEN_ID_HEX_LEN: usize = 64;

/// Reference to a single transaction output (tx id and output index)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutPointRef {
    pub tx_id: String,
    pub output_index: u32,
}

impl OutPointRef {
    pub fn new(tx_id: impl Into<String>, output_index: u32) -> Self {
        Self {
            tx_id: tx_id.into(),
            output_index,
        }
    }
}

impl fmt::Display for OutPointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.output_index)
    }
}

/// Unspent output as reported by the wallet client
///
/// This is read-only input to the engine. The token attachment is kept in
/// its raw, unvalidated form; the token extractor decides whether it is
/// usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUtxo {
    /// Id of the transaction that created this output
    pub tx_id: String,

    /// Index of the output within that transaction
    pub output_index: u32,

    /// Plain-currency value in atoms
    pub value_atoms: u64,

    /// Block height of the confirming block (absent or zero when unconfirmed)
    #[serde(default)]
    pub confirmation_height: Option<u32>,

    /// Address holding this output, if the wallet client reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Token data attached to this output, if any
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_attachment",
        skip_serializing_if = "Option::is_none"
    )]
    pub token_attachment: Option<RawTokenAttachment>,
}

impl RawUtxo {
    /// Create a plain-currency output with no token data
    pub fn new(tx_id: impl Into<String>, output_index: u32, value_atoms: u64) -> Self {
        Self {
            tx_id: tx_id.into(),
            output_index,
            value_atoms,
            confirmation_height: None,
            address: None,
            token_attachment: None,
        }
    }

    /// Set the confirmation height
    pub fn with_confirmation_height(mut self, height: u32) -> Self {
        self.confirmation_height = Some(height);
        self
    }

    /// Set the holding address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attach token data
    pub fn with_token(mut self, attachment: RawTokenAttachment) -> Self {
        self.token_attachment = Some(attachment);
        self
    }

    pub fn outpoint(&self) -> OutPointRef {
        OutPointRef::new(self.tx_id.clone(), self.output_index)
    }

    /// An output with no confirmation height, or height zero, is unconfirmed
    pub fn is_unconfirmed(&self) -> bool {
        matches!(self.confirmation_height, None | Some(0))
    }
}

// A well-formed attachment is read as is. Otherwise the token id is kept
// whenever it is a string and each remaining field falls back to its default,
// so a bad amount or decimals value never turns a token output into a plain
// one. Only an attachment without a string token id is dropped.
fn deserialize_lenient_attachment<'de, D>(
    deserializer: D,
) -> Result<Option<RawTokenAttachment>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| {
        match serde_json::from_value::<RawTokenAttachment>(value.clone()) {
            Ok(attachment) => Some(attachment),
            Err(e) => salvage_attachment(value, &e),
        }
    }))
}

fn salvage_attachment(
    value: serde_json::Value,
    error: &serde_json::Error,
) -> Option<RawTokenAttachment> {
    let mut fields = match value {
        serde_json::Value::Object(fields) => fields,
        _ => {
            warn!("Discarding unreadable token attachment: {}", error);
            return None;
        }
    };

    let token_id = match fields.remove("token_id") {
        Some(serde_json::Value::String(token_id)) => token_id,
        _ => {
            warn!("Discarding token attachment without a token id: {}", error);
            return None;
        }
    };

    warn!(
        "Token attachment partially unreadable, defaulting bad fields: {}",
        error
    );

    fn field<T: DeserializeOwned + Default>(
        fields: &mut serde_json::Map<String, serde_json::Value>,
        key: &str,
    ) -> T {
        fields
            .remove(key)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    Some(RawTokenAttachment {
        token_id,
        amount: field(&mut fields, "amount"),
        is_mint_authority: field(&mut fields, "is_mint_authority"),
        protocol_tag: field(&mut fields, "protocol_tag"),
        decimals: field(&mut fields, "decimals"),
        ticker: field(&mut fields, "ticker"),
        name: field(&mut fields, "name"),
    })
}

/// Token amount as it appears on the wire: an integer or a decimal string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTokenAmount {
    Atoms(u64),
    Text(String),
}

impl Default for RawTokenAmount {
    fn default() -> Self {
        RawTokenAmount::Atoms(0)
    }
}

impl From<u64> for RawTokenAmount {
    fn from(atoms: u64) -> Self {
        RawTokenAmount::Atoms(atoms)
    }
}

impl From<&str> for RawTokenAmount {
    fn from(text: &str) -> Self {
        RawTokenAmount::Text(text.to_string())
    }
}

/// Unvalidated token attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTokenAttachment {
    pub token_id: String,

    #[serde(default)]
    pub amount: RawTokenAmount,

    #[serde(default)]
    pub is_mint_authority: bool,

    /// Token protocol name as reported by the client (e.g. "ALP", "SLP")
    #[serde(default)]
    pub protocol_tag: String,

    #[serde(default)]
    pub decimals: u8,

    #[serde(default)]
    pub ticker: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

impl RawTokenAttachment {
    pub fn new(token_id: impl Into<String>, amount: impl Into<RawTokenAmount>) -> Self {
        Self {
            token_id: token_id.into(),
            amount: amount.into(),
            is_mint_authority: false,
            protocol_tag: String::new(),
            decimals: 0,
            ticker: None,
            name: None,
        }
    }

    pub fn mint_authority(mut self) -> Self {
        self.is_mint_authority = true;
        self
    }

    pub fn with_protocol(mut self, protocol_tag: impl Into<String>) -> Self {
        self.protocol_tag = protocol_tag.into();
        self
    }

    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }
}

/// Validated token attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAttachment {
    /// Lower-case 64 character hex token id
    pub token_id: String,

    /// Token amount in atoms (always a non-negative integer)
    pub amount_atoms: Decimal,

    pub is_mint_authority: bool,

    pub protocol_tag: String,

    pub decimals: u8,

    pub ticker: Option<String>,

    pub name: Option<String>,
}

impl TokenAttachment {
    /// Token amount scaled by `decimals` for display
    ///
    /// Returns `None` when the scale cannot be represented.
    pub fn display_amount(&self) -> Option<Decimal> {
        let mut amount = self.amount_atoms;
        amount.set_scale(u32::from(self.decimals)).ok()?;
        Some(amount.normalize())
    }
}

/// Semantic category of an unspent output
///
/// Exactly one variant applies to each output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtxoType {
    PureDust,
    TokenBearing,
    MintAuthority,
    ChangeLike,
    Large,
    Standard,
}

impl UtxoType {
    /// All variants in reporting order
    pub const ALL: [UtxoType; 6] = [
        UtxoType::PureDust,
        UtxoType::TokenBearing,
        UtxoType::MintAuthority,
        UtxoType::ChangeLike,
        UtxoType::Large,
        UtxoType::Standard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UtxoType::PureDust => "pure_dust",
            UtxoType::TokenBearing => "token_bearing",
            UtxoType::MintAuthority => "mint_authority",
            UtxoType::ChangeLike => "change_like",
            UtxoType::Large => "large",
            UtxoType::Standard => "standard",
        }
    }

    /// Whether outputs of this type carry token value
    pub fn is_token(&self) -> bool {
        matches!(self, UtxoType::TokenBearing | UtxoType::MintAuthority)
    }
}

impl fmt::Display for UtxoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health status of an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Dust,
    Suspicious,
    Unknown,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 4] = [
        HealthStatus::Healthy,
        HealthStatus::Dust,
        HealthStatus::Suspicious,
        HealthStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Dust => "dust",
            HealthStatus::Suspicious => "suspicious",
            HealthStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health status with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub status: HealthStatus,
    pub reasoning: String,
}

impl HealthAssessment {
    pub fn new(status: HealthStatus, reasoning: impl Into<String>) -> Self {
        Self {
            status,
            reasoning: reasoning.into(),
        }
    }
}

/// An unspent output together with its classification
///
/// Only the classifier builds these, which keeps `is_pure_dust` and
/// `has_token` consistent with `utxo_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedUtxo {
    pub(crate) utxo: RawUtxo,
    pub(crate) token: Option<TokenAttachment>,
    pub(crate) utxo_type: UtxoType,
    pub(crate) health: HealthAssessment,
    pub(crate) is_pure_dust: bool,
    pub(crate) has_token: bool,
}

impl ClassifiedUtxo {
    pub fn utxo(&self) -> &RawUtxo {
        &self.utxo
    }

    /// Validated token data, if the output carries any
    pub fn token(&self) -> Option<&TokenAttachment> {
        self.token.as_ref()
    }

    pub fn utxo_type(&self) -> UtxoType {
        self.utxo_type
    }

    pub fn health(&self) -> &HealthAssessment {
        &self.health
    }

    pub fn is_pure_dust(&self) -> bool {
        self.is_pure_dust
    }

    pub fn has_token(&self) -> bool {
        self.has_token
    }

    pub fn value_atoms(&self) -> u64 {
        self.utxo.value_atoms
    }

    pub fn outpoint(&self) -> OutPointRef {
        self.utxo.outpoint()
    }

    pub fn is_unconfirmed(&self) -> bool {
        self.utxo.is_unconfirmed()
    }
}

/// Severity of a threat, also used as recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Sort weight, `Critical` = 4 down to `Low` = 1
    pub fn weight(&self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shorten a string for display, keeping the first `prefix_chars` characters
pub fn sanitize_for_display(input: &str, prefix_chars: usize) -> String {
    if input.chars().count() <= prefix_chars {
        return input.to_string();
    }
    let prefix: String = input.chars().take(prefix_chars).collect();
    format!("{}...", prefix)
}
