//! Wallet security and health scoring
//!
//! The scorer runs a set of independent [`Detector`]s over a classified
//! snapshot, combines the snapshot's metrics into a weighted composite score
//! and derives a prioritized list of recommendations.
//!
//! # Module Structure
//!
//! - `detectors.rs` - dust, privacy, suspicious-pattern and address detectors
//! - `score.rs` - composite score formula and status bands
//! - `recommendations.rs` - maps fired threats to recommended actions
//!
//! # Analytics
//!
//! Privacy scores and suspicious-activity judgments come from a
//! [`UtxoAnalytics`] collaborator. When it fails or is missing the scorer
//! still produces a report, using a privacy score of 50 and keeping the
//! classifier's own health status, and records the gap in
//! [`SecurityReport::analytics_coverage`] and [`SecurityReport::warnings`].
//!
//! Token-bearing outputs always count as healthy and never as dust, whatever
//! their plain-currency value.

pub mod detectors;
pub mod recommendations;
pub mod score;

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::analytics::{AnalyticsError, UtxoAnalytics};
use crate::config::{EngineConfig, ScoringConfig};
use crate::logging::{self, sanitize_for_logging, LogLevel};
use crate::portfolio::{aggregate, PortfolioSummary};
use crate::types::{ClassifiedUtxo, HealthStatus, Severity, UtxoType};

pub use detectors::{default_detectors, find_dust_patterns, is_round_value, Detector};
pub use recommendations::{recommend, Recommendation, RecommendationCategory};
pub use score::{composite_score, percentage, status_for_score, SecurityStatus};

/// Kind of threat a detector can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreatKind {
    DustAttack,
    SystematicDust,
    LowPrivacy,
    RoundNumbers,
    SuspiciousActivity,
    UnconfirmedAccumulation,
    AddressConcentration,
}

impl ThreatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatKind::DustAttack => "dust-attack",
            ThreatKind::SystematicDust => "systematic-dust",
            ThreatKind::LowPrivacy => "low-privacy",
            ThreatKind::RoundNumbers => "round-numbers",
            ThreatKind::SuspiciousActivity => "suspicious-activity",
            ThreatKind::UnconfirmedAccumulation => "unconfirmed-accumulation",
            ThreatKind::AddressConcentration => "address-concentration",
        }
    }
}

impl fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected threat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    pub kind: ThreatKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub affected_count: usize,
}

/// Dust outputs sharing one identical value
///
/// Non-systematic patterns are informational notes, not threats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DustPattern {
    pub value_atoms: u64,
    pub count: usize,
    pub systematic: bool,
}

/// Metrics the composite score is computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityMetrics {
    pub total_utxos: usize,
    pub healthy_utxos: usize,
    pub dust_utxos: usize,
    pub token_utxos: usize,
    pub suspicious_utxos: usize,
    pub unconfirmed_utxos: usize,
    /// Average privacy score, 0..=100
    pub privacy_score: f64,
    /// Percentages of `total_utxos`
    pub dust_ratio: f64,
    pub suspicious_ratio: f64,
    pub token_ratio: f64,
    pub healthy_ratio: f64,
}

/// How much of the snapshot the analytics collaborator could assess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalyticsCoverage {
    /// Every lookup succeeded
    Full,
    /// Some lookups failed; defaults were used for those outputs
    Partial { failed: usize },
    /// No lookup succeeded; the report rests on defaults only
    Unavailable,
}

/// Complete security and health report for a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityReport {
    pub wallet_address: String,
    pub overall_score: u8,
    pub status: SecurityStatus,
    pub metrics: SecurityMetrics,
    /// Sorted by descending severity
    pub threats: Vec<Threat>,
    /// Sorted by descending priority
    pub recommendations: Vec<Recommendation>,
    pub token_portfolio: PortfolioSummary,
    pub dust_patterns: Vec<DustPattern>,
    pub analytics_coverage: AnalyticsCoverage,
    pub warnings: Vec<String>,
}

impl SecurityReport {
    pub fn has_threat(&self, kind: ThreatKind) -> bool {
        self.threats.iter().any(|t| t.kind == kind)
    }

    pub fn threat(&self, kind: ThreatKind) -> Option<&Threat> {
        self.threats.iter().find(|t| t.kind == kind)
    }

    /// Highest severity among the threats, if any
    pub fn max_severity(&self) -> Option<Severity> {
        self.threats.iter().map(|t| t.severity).max()
    }

    /// No threats, and the analysis was not blind to analytics
    pub fn is_clean(&self) -> bool {
        self.threats.is_empty() && self.analytics_coverage != AnalyticsCoverage::Unavailable
    }
}

/// Inputs shared by all detectors
pub struct ScoringContext<'a> {
    pub utxos: &'a [ClassifiedUtxo],
    /// Health per output after analytics judgments, parallel to `utxos`
    pub effective_status: Vec<HealthStatus>,
    /// Average of the supplied privacy scores, or the default
    pub privacy_score: f64,
    /// Outputs for which analytics supplied a privacy score
    pub scored_outputs: usize,
    pub wallet_address: &'a str,
    pub dust_threshold: u64,
    pub config: &'a ScoringConfig,
}

/// Builds [`SecurityReport`]s from classified snapshots
pub struct SecurityScorer {
    config: ScoringConfig,
    dust_threshold: u64,
    detectors: Vec<Box<dyn Detector + Send + Sync>>,
}

impl SecurityScorer {
    /// Create a scorer with the default detectors
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.scoring.clone(),
            dust_threshold: config.classification.dust_threshold,
            detectors: default_detectors(),
        }
    }

    /// Replace the detector set
    pub fn with_detectors(mut self, detectors: Vec<Box<dyn Detector + Send + Sync>>) -> Self {
        self.detectors = detectors;
        self
    }

    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Score a classified snapshot
    pub fn score(
        &self,
        utxos: &[ClassifiedUtxo],
        wallet_address: &str,
        analytics: &dyn UtxoAnalytics,
    ) -> SecurityReport {
        let insight = gather_insight(utxos, analytics, self.config.default_privacy_score);

        let ctx = ScoringContext {
            utxos,
            effective_status: insight.effective_status,
            privacy_score: insight.privacy_score,
            scored_outputs: insight.scored_outputs,
            wallet_address,
            dust_threshold: self.dust_threshold,
            config: &self.config,
        };

        let metrics = compute_metrics(&ctx);

        let mut threats: Vec<Threat> = self
            .detectors
            .iter()
            .flat_map(|detector| detector.detect(&ctx))
            .collect();
        // Stable sort keeps detector order within one severity
        threats.sort_by(|a, b| b.severity.weight().cmp(&a.severity.weight()));

        let token_portfolio = aggregate(utxos);
        let recommendations = recommend(&threats, &token_portfolio);

        let composite = composite_score(
            metrics.privacy_score,
            metrics.healthy_ratio / 100.0,
            metrics.dust_ratio,
            metrics.suspicious_ratio,
            &self.config.weights,
        );
        let overall_score = composite.round().clamp(0.0, 100.0) as u8;
        let status = status_for_score(composite);

        logging::log_scoring(
            LogLevel::Info,
            "security report built",
            Some(json!({
                "wallet": sanitize_for_logging(wallet_address),
                "outputs": metrics.total_utxos,
                "score": overall_score,
                "threats": threats.len(),
            })),
        );

        SecurityReport {
            wallet_address: wallet_address.to_string(),
            overall_score,
            status,
            metrics,
            threats,
            recommendations,
            token_portfolio,
            dust_patterns: find_dust_patterns(utxos, &self.config),
            analytics_coverage: insight.coverage,
            warnings: insight.warnings,
        }
    }
}

struct AnalyticsInsight {
    effective_status: Vec<HealthStatus>,
    privacy_score: f64,
    scored_outputs: usize,
    coverage: AnalyticsCoverage,
    warnings: Vec<String>,
}

// Query the analytics collaborator once per output and fold the answers.
// Failed lookups fall back to defaults and are counted, never propagated.
fn gather_insight(
    utxos: &[ClassifiedUtxo],
    analytics: &dyn UtxoAnalytics,
    default_privacy_score: u8,
) -> AnalyticsInsight {
    let mut effective_status = Vec::with_capacity(utxos.len());
    let mut score_sum: u64 = 0;
    let mut scored_outputs = 0;
    let mut failed_outputs = 0;
    let mut first_error: Option<AnalyticsError> = None;

    for utxo in utxos {
        let mut failed = false;

        match analytics.privacy_score(utxo) {
            Ok(Some(score)) => {
                score_sum += u64::from(score.min(100));
                scored_outputs += 1;
            }
            Ok(None) => {}
            Err(e) => {
                failed = true;
                first_error.get_or_insert(e);
            }
        }

        let judged = match analytics.health_judgment(utxo) {
            Ok(judged) => judged,
            Err(e) => {
                failed = true;
                first_error.get_or_insert(e);
                None
            }
        };

        // Only a suspicious judgment overrides the classifier; dust and
        // token status stay as classified.
        let status = match judged {
            Some(HealthStatus::Suspicious) => HealthStatus::Suspicious,
            _ => utxo.health().status,
        };
        effective_status.push(status);

        if failed {
            failed_outputs += 1;
        }
    }

    let privacy_score = if scored_outputs > 0 {
        score_sum as f64 / scored_outputs as f64
    } else {
        f64::from(default_privacy_score)
    };

    let mut warnings = Vec::new();
    let coverage = if failed_outputs == 0 {
        AnalyticsCoverage::Full
    } else if failed_outputs == utxos.len() {
        AnalyticsCoverage::Unavailable
    } else {
        AnalyticsCoverage::Partial {
            failed: failed_outputs,
        }
    };

    match (&coverage, &first_error) {
        (AnalyticsCoverage::Unavailable, Some(e)) => warnings.push(format!(
            "{}; privacy defaults to {} and suspicious activity could not be assessed",
            e, default_privacy_score
        )),
        (AnalyticsCoverage::Partial { failed }, Some(e)) => warnings.push(format!(
            "Analytics failed for {} of {} outputs ({}); defaults used for those outputs",
            failed,
            utxos.len(),
            e
        )),
        _ => {}
    }

    if coverage != AnalyticsCoverage::Full {
        logging::log_enrichment(
            LogLevel::Warn,
            "analytics incomplete, using defaults",
            Some(json!({ "failed_outputs": failed_outputs, "outputs": utxos.len() })),
        );
    }

    AnalyticsInsight {
        effective_status,
        privacy_score,
        scored_outputs,
        coverage,
        warnings,
    }
}

fn compute_metrics(ctx: &ScoringContext<'_>) -> SecurityMetrics {
    let total = ctx.utxos.len();
    let dust = ctx
        .utxos
        .iter()
        .filter(|u| u.utxo_type() == UtxoType::PureDust)
        .count();
    let tokens = ctx.utxos.iter().filter(|u| u.has_token()).count();
    let unconfirmed = ctx.utxos.iter().filter(|u| u.is_unconfirmed()).count();
    let healthy = ctx
        .effective_status
        .iter()
        .filter(|s| **s == HealthStatus::Healthy)
        .count();
    let suspicious = ctx
        .effective_status
        .iter()
        .filter(|s| **s == HealthStatus::Suspicious)
        .count();

    // An empty wallet has nothing unhealthy in it
    let healthy_ratio = if total == 0 {
        100.0
    } else {
        percentage(healthy, total)
    };

    SecurityMetrics {
        total_utxos: total,
        healthy_utxos: healthy,
        dust_utxos: dust,
        token_utxos: tokens,
        suspicious_utxos: suspicious,
        unconfirmed_utxos: unconfirmed,
        privacy_score: ctx.privacy_score,
        dust_ratio: percentage(dust, total),
        suspicious_ratio: percentage(suspicious, total),
        token_ratio: percentage(tokens, total),
        healthy_ratio,
    }
}
