//! Analysis engine façade
//!
//! [`AnalysisEngine`] bundles an [`EngineConfig`] with an analytics
//! collaborator and exposes the four entry points every caller uses:
//! classification, aggregation, security reporting and strategy selection.
//! The engine holds no per-analysis state; every call works on the snapshot
//! it is given.

use serde_json::json;

use crate::analytics::{NoAnalytics, UtxoAnalytics};
use crate::classification;
use crate::config::EngineConfig;
use crate::error::DustwatchResult;
use crate::logging::{self, sanitize_for_logging, LogLevel};
use crate::portfolio::{self, PortfolioSummary};
use crate::scoring::{SecurityReport, SecurityScorer};
use crate::selection::{self, SpendStrategy, StrategySelection};
use crate::types::{ClassifiedUtxo, RawUtxo};
use crate::wallet_client::{
    enrich_token_metadata, DetailedBalance, EnrichmentWarning, SnapshotFile, WalletClient,
};

/// Everything produced by one wallet analysis
#[derive(Debug, Clone)]
pub struct WalletAnalysis {
    pub utxos: Vec<ClassifiedUtxo>,
    pub report: SecurityReport,
    /// `None` when the client could not report a balance
    pub balance: Option<DetailedBalance>,
    pub enrichment_warnings: Vec<EnrichmentWarning>,
}

pub struct AnalysisEngine {
    config: EngineConfig,
    analytics: Box<dyn UtxoAnalytics>,
    scorer: SecurityScorer,
}

impl AnalysisEngine {
    /// Create an engine without an analytics service
    pub fn new(config: EngineConfig) -> Self {
        Self::with_analytics(config, Box::new(NoAnalytics))
    }

    pub fn with_analytics(config: EngineConfig, analytics: Box<dyn UtxoAnalytics>) -> Self {
        let scorer = SecurityScorer::new(&config);
        Self {
            config,
            analytics,
            scorer,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classify_all(&self, utxos: &[RawUtxo]) -> Vec<ClassifiedUtxo> {
        classification::classify_all(utxos, &self.config.classification)
    }

    pub fn aggregate(&self, utxos: &[ClassifiedUtxo]) -> PortfolioSummary {
        portfolio::aggregate(utxos)
    }

    pub fn build_security_report(
        &self,
        utxos: &[ClassifiedUtxo],
        wallet_address: &str,
    ) -> SecurityReport {
        self.scorer
            .score(utxos, wallet_address, self.analytics.as_ref())
    }

    pub fn select_for_strategy(
        &self,
        utxos: &[ClassifiedUtxo],
        strategy: SpendStrategy,
    ) -> StrategySelection {
        selection::select_for_strategy(utxos, strategy, &self.config.classification)
    }

    /// Fetch, enrich, classify and score the wallet behind `client`
    ///
    /// Only a failed UTXO snapshot aborts the analysis. Metadata and balance
    /// failures are folded into the report's warnings.
    pub fn analyze(
        &self,
        client: &dyn WalletClient,
        wallet_address: &str,
    ) -> DustwatchResult<WalletAnalysis> {
        self.analyze_with(client, wallet_address, self.analytics.as_ref())
    }

    /// Analyze a snapshot file, preferring the analytics stored in it
    pub fn analyze_snapshot(
        &self,
        snapshot: &SnapshotFile,
        address_override: Option<&str>,
    ) -> DustwatchResult<WalletAnalysis> {
        let address = address_override.unwrap_or(snapshot.address.as_str());
        match snapshot.analytics() {
            Some(stored) => self.analyze_with(snapshot, address, &stored),
            None => self.analyze_with(snapshot, address, self.analytics.as_ref()),
        }
    }

    fn analyze_with(
        &self,
        client: &dyn WalletClient,
        wallet_address: &str,
        analytics: &dyn UtxoAnalytics,
    ) -> DustwatchResult<WalletAnalysis> {
        let mut raw = client.utxo_snapshot()?;
        let enrichment_warnings = enrich_token_metadata(&mut raw, client);

        let utxos = self.classify_all(&raw);
        let mut report = self.scorer.score(&utxos, wallet_address, analytics);
        report
            .warnings
            .extend(enrichment_warnings.iter().map(|w| w.to_string()));

        let balance = match client.detailed_balance() {
            Ok(balance) => Some(balance),
            Err(e) => {
                report.warnings.push(format!("Balance unavailable: {}", e));
                None
            }
        };

        logging::log_scoring(
            LogLevel::Debug,
            "wallet analysis complete",
            Some(json!({
                "wallet": sanitize_for_logging(wallet_address),
                "outputs": utxos.len(),
                "warnings": report.warnings.len(),
            })),
        );

        Ok(WalletAnalysis {
            utxos,
            report,
            balance,
            enrichment_warnings,
        })
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
