//! Threat detectors
//!
//! Each detector looks at one aspect of the classified snapshot and returns
//! zero or more threats. Detectors are independent of each other and of
//! their order; the scorer sorts the combined output.

use std::collections::{BTreeMap, HashMap};

use crate::config::ScoringConfig;
use crate::scoring::{DustPattern, ScoringContext, Threat, ThreatKind};
use crate::types::{sanitize_for_display, ClassifiedUtxo, HealthStatus, Severity, UtxoType};

/// A detector evaluating one aspect of wallet health
pub trait Detector {
    fn name(&self) -> &'static str;
    fn detect(&self, ctx: &ScoringContext<'_>) -> Vec<Threat>;
}

/// All detectors in their default configuration
pub fn default_detectors() -> Vec<Box<dyn Detector + Send + Sync>> {
    vec![
        Box::new(DustAttackDetector),
        Box::new(PrivacyDetector),
        Box::new(SuspiciousPatternDetector),
        Box::new(AddressConcentrationDetector),
    ]
}

/// Group pure-dust outputs by identical value
///
/// Returns every value shared by at least `dust_pattern_count` outputs,
/// ordered by value. Patterns reaching `systematic_dust_count` are marked
/// systematic.
pub fn find_dust_patterns(utxos: &[ClassifiedUtxo], config: &ScoringConfig) -> Vec<DustPattern> {
    let mut by_value: BTreeMap<u64, usize> = BTreeMap::new();
    for utxo in utxos.iter().filter(|u| u.utxo_type() == UtxoType::PureDust) {
        *by_value.entry(utxo.value_atoms()).or_insert(0) += 1;
    }

    by_value
        .into_iter()
        .filter(|(_, count)| *count >= config.dust_pattern_count)
        .map(|(value_atoms, count)| DustPattern {
            value_atoms,
            count,
            systematic: count >= config.systematic_dust_count,
        })
        .collect()
}

/// Whether `value` is an exact multiple of one of the round denominations
pub fn is_round_value(value: u64, denominations: &[u64]) -> bool {
    value > 0 && denominations.iter().any(|d| *d > 0 && value % d == 0)
}

/// Dust accumulation and systematic same-value dusting
pub struct DustAttackDetector;

impl Detector for DustAttackDetector {
    fn name(&self) -> &'static str {
        "dust_attack"
    }

    fn detect(&self, ctx: &ScoringContext<'_>) -> Vec<Threat> {
        let mut threats = Vec::new();

        let dust_count = ctx
            .utxos
            .iter()
            .filter(|u| u.utxo_type() == UtxoType::PureDust)
            .count();

        if dust_count >= ctx.config.dust_attack_count {
            threats.push(Threat {
                kind: ThreatKind::DustAttack,
                severity: Severity::High,
                title: "Possible dust attack".to_string(),
                description: format!(
                    "{} outputs hold {} atoms or less and carry no tokens",
                    dust_count, ctx.dust_threshold
                ),
                impact: "Spending dust together with other outputs links your addresses \
                         and lets an observer trace the wallet"
                    .to_string(),
                affected_count: dust_count,
            });
        }

        for pattern in find_dust_patterns(ctx.utxos, ctx.config)
            .into_iter()
            .filter(|p| p.systematic)
        {
            threats.push(Threat {
                kind: ThreatKind::SystematicDust,
                severity: Severity::Critical,
                title: "Systematic dusting detected".to_string(),
                description: format!(
                    "{} dust outputs share the identical value of {} atoms",
                    pattern.count, pattern.value_atoms
                ),
                impact: "Identical dust amounts are a strong signal of a targeted \
                         tracking campaign against this wallet"
                    .to_string(),
                affected_count: pattern.count,
            });
        }

        threats
    }
}

/// Low average privacy and round-number clustering
pub struct PrivacyDetector;

impl Detector for PrivacyDetector {
    fn name(&self) -> &'static str {
        "privacy"
    }

    fn detect(&self, ctx: &ScoringContext<'_>) -> Vec<Threat> {
        let mut threats = Vec::new();

        if ctx.scored_outputs > 0 && ctx.privacy_score < ctx.config.low_privacy_threshold {
            threats.push(Threat {
                kind: ThreatKind::LowPrivacy,
                severity: Severity::Medium,
                title: "Low privacy score".to_string(),
                description: format!(
                    "Average privacy score is {:.1} across {} scored outputs",
                    ctx.privacy_score, ctx.scored_outputs
                ),
                impact: "Outputs are easy to link to each other and to your identity".to_string(),
                affected_count: ctx.scored_outputs,
            });
        }

        let round_count = ctx
            .utxos
            .iter()
            .filter(|u| is_round_value(u.value_atoms(), &ctx.config.round_denominations))
            .count();

        if round_count >= ctx.config.round_number_count {
            threats.push(Threat {
                kind: ThreatKind::RoundNumbers,
                severity: Severity::Low,
                title: "Round-number outputs".to_string(),
                description: format!("{} outputs hold exactly round amounts", round_count),
                impact: "Round amounts are easier to correlate across transactions".to_string(),
                affected_count: round_count,
            });
        }

        threats
    }
}

/// Outputs judged suspicious and piles of unconfirmed outputs
pub struct SuspiciousPatternDetector;

impl Detector for SuspiciousPatternDetector {
    fn name(&self) -> &'static str {
        "suspicious_pattern"
    }

    fn detect(&self, ctx: &ScoringContext<'_>) -> Vec<Threat> {
        let mut threats = Vec::new();

        let suspicious = ctx
            .effective_status
            .iter()
            .filter(|s| **s == HealthStatus::Suspicious)
            .count();

        if suspicious > 0 {
            let severity = if suspicious >= ctx.config.suspicious_high_count {
                Severity::High
            } else {
                Severity::Medium
            };
            threats.push(Threat {
                kind: ThreatKind::SuspiciousActivity,
                severity,
                title: "Suspicious outputs".to_string(),
                description: format!(
                    "{} outputs were flagged as suspicious by wallet analytics",
                    suspicious
                ),
                impact: "Suspicious outputs may originate from tainted or tracked sources"
                    .to_string(),
                affected_count: suspicious,
            });
        }

        let unconfirmed = ctx.utxos.iter().filter(|u| u.is_unconfirmed()).count();
        if unconfirmed >= ctx.config.unconfirmed_count {
            threats.push(Threat {
                kind: ThreatKind::UnconfirmedAccumulation,
                severity: Severity::Medium,
                title: "Unconfirmed outputs accumulating".to_string(),
                description: format!("{} outputs are still unconfirmed", unconfirmed),
                impact: "Unconfirmed funds can be replaced or double-spent and should not \
                         be relied on"
                    .to_string(),
                affected_count: unconfirmed,
            });
        }

        threats
    }
}

/// Too many outputs sitting on a single address
pub struct AddressConcentrationDetector;

impl Detector for AddressConcentrationDetector {
    fn name(&self) -> &'static str {
        "address_concentration"
    }

    fn detect(&self, ctx: &ScoringContext<'_>) -> Vec<Threat> {
        let mut per_address: HashMap<&str, usize> = HashMap::new();
        for utxo in ctx.utxos {
            let address = utxo.utxo().address.as_deref().unwrap_or(ctx.wallet_address);
            *per_address.entry(address).or_insert(0) += 1;
        }

        let mut concentrated: Vec<(&str, usize)> = per_address
            .into_iter()
            .filter(|(_, count)| *count >= ctx.config.address_concentration_count)
            .collect();
        concentrated.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        concentrated
            .into_iter()
            .map(|(address, count)| Threat {
                kind: ThreatKind::AddressConcentration,
                severity: Severity::Low,
                title: "Outputs concentrated on one address".to_string(),
                description: format!(
                    "{} outputs sit on address {}",
                    count,
                    sanitize_for_display(address, 16)
                ),
                impact: "Address reuse ties all of these payments together".to_string(),
                affected_count: count,
            })
            .collect()
    }
}
