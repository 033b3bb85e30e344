//! Dustwatch Common Library
//!
//! UTXO analysis engine for token-carrying ledgers: classifies every unspent
//! output, scores the health and privacy of the wallet holding them, and
//! selects inputs for plain-currency spends without ever touching an output
//! that carries token value.
//!
//! # Modules
//!
//! - `types`: Core domain types and threshold constants
//! - `classification`: Token extraction and per-output classification
//! - `portfolio`: Counts by type and health, token holdings
//! - `analytics`: External privacy/health analytics interface
//! - `scoring`: Threat detectors, composite score and recommendations
//! - `selection`: Strategy-based, token-safe input selection
//! - `wallet_client`: External wallet client interface and JSON snapshots
//! - `export`: Versioned report documents
//! - `engine`: Façade combining the above
//! - `config`: Engine configuration
//! - `logging`: Privacy-aware logging
//! - `error`: Error types
//!
//! # Guarantees
//!
//! - The engine is a pure function of the snapshot it is given: it never
//!   signs, broadcasts or mutates ledger state.
//! - Token-bearing and mint-authority outputs are never selected for
//!   spending, under any strategy.
//! - Malformed input and failing collaborators degrade to defaults with a
//!   warning; they never abort classification or scoring.

/// Core domain types
pub mod types;

/// UTXO classification and token extraction
pub mod classification;

/// Portfolio aggregation
pub mod portfolio;

/// External analytics interface
pub mod analytics;

/// Security and health scoring
pub mod scoring;

/// Token-safe input selection
pub mod selection;

/// External wallet client interface
pub mod wallet_client;

/// Report export documents
pub mod export;

/// Analysis engine façade
pub mod engine;

/// Configuration management
pub mod config;

/// Privacy-aware logging
pub mod logging;

/// Standardized error handling
pub mod error;

/// Re-export common types for convenience
pub use types::{
    sanitize_for_display, ClassifiedUtxo, HealthAssessment, HealthStatus, OutPointRef, RawTokenAmount,
    RawTokenAttachment, RawUtxo, Severity, TokenAttachment, UtxoType, DUST_THRESHOLD,
    LARGE_THRESHOLD, TOKEN_ID_HEX_LEN,
};

pub use analytics::{AnalyticsError, NoAnalytics, StaticAnalytics, UtxoAnalytics};
pub use config::{ClassificationConfig, EngineConfig, ScoreWeights, ScoringConfig};
pub use engine::{AnalysisEngine, WalletAnalysis};
pub use error::{DustwatchError, DustwatchResult, ErrorContext};
pub use export::{ClassificationReportDocument, SecurityReportDocument};
pub use portfolio::{PortfolioSummary, TokenHolding};
pub use scoring::{
    AnalyticsCoverage, Recommendation, SecurityReport, SecurityScorer, SecurityStatus, Threat,
    ThreatKind,
};
pub use selection::{SelectionWarning, SpendStrategy, StrategySelection};
pub use wallet_client::{DetailedBalance, SnapshotFile, TokenMetadata, WalletClient};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization
///
/// Sets up logging with the default configuration. Safe to call multiple
/// times; only the first call has an effect.
pub fn init() -> Result<(), String> {
    let config = logging::LogConfig::default();
    logging::init(&config).map_err(|e| format!("Failed to initialize logging: {}", e))
}
