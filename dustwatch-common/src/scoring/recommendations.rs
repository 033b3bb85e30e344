use serde::{Deserialize, Serialize};

use crate::portfolio::PortfolioSummary;
use crate::scoring::{Threat, ThreatKind};
use crate::types::Severity;

/// Area a recommendation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Security,
    Privacy,
    Maintenance,
    TokenSafety,
}

/// Action suggested to the wallet owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Severity,
    pub category: RecommendationCategory,
    pub title: String,
    pub description: String,
    pub action: String,
    pub command_hint: Option<String>,
    pub impact: String,
}

fn for_threat(threat: &Threat) -> Recommendation {
    let (category, title, action, command_hint, impact) = match threat.kind {
        ThreatKind::DustAttack => (
            RecommendationCategory::Security,
            "Leave dust outputs unspent",
            "Exclude dust from coin selection and never combine it with other inputs",
            Some("dustwatch select --strategy security"),
            "Prevents an attacker from linking your addresses through spent dust",
        ),
        ThreatKind::SystematicDust => (
            RecommendationCategory::Security,
            "Quarantine systematically dusted outputs",
            "Treat identical-value dust as hostile: freeze it and rotate to a fresh address",
            Some("dustwatch select --strategy security"),
            "Defeats the tracking campaign behind the identical dust amounts",
        ),
        ThreatKind::LowPrivacy => (
            RecommendationCategory::Privacy,
            "Improve output privacy",
            "Spend with the privacy strategy and avoid reusing addresses",
            Some("dustwatch select --strategy privacy"),
            "Makes it harder to cluster your outputs",
        ),
        ThreatKind::RoundNumbers => (
            RecommendationCategory::Privacy,
            "Avoid round amounts",
            "Send and receive non-round amounts where possible",
            None,
            "Reduces how easily payments can be matched across transactions",
        ),
        ThreatKind::SuspiciousActivity => (
            RecommendationCategory::Security,
            "Review suspicious outputs",
            "Inspect flagged outputs before spending and keep them out of routine payments",
            Some("dustwatch classify"),
            "Keeps potentially tainted funds isolated from clean ones",
        ),
        ThreatKind::UnconfirmedAccumulation => (
            RecommendationCategory::Maintenance,
            "Wait for confirmations",
            "Do not rely on unconfirmed outputs until they confirm",
            None,
            "Avoids building on funds that may still be replaced",
        ),
        ThreatKind::AddressConcentration => (
            RecommendationCategory::Privacy,
            "Rotate receiving addresses",
            "Use a fresh address for each incoming payment",
            None,
            "Stops new payments from being tied to the existing output pile",
        ),
    };

    Recommendation {
        priority: threat.severity,
        category,
        title: title.to_string(),
        description: threat.description.clone(),
        action: action.to_string(),
        command_hint: command_hint.map(str::to_string),
        impact: impact.to_string(),
    }
}

/// Recommendations for the fired threats, sorted by descending priority
///
/// Wallets holding tokens also get a token-safety reminder.
pub fn recommend(threats: &[Threat], portfolio: &PortfolioSummary) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = threats.iter().map(for_threat).collect();

    if portfolio.token_utxos > 0 {
        recommendations.push(Recommendation {
            priority: Severity::Low,
            category: RecommendationCategory::TokenSafety,
            title: "Protect token-bearing outputs".to_string(),
            description: format!(
                "{} outputs carry tokens across {} token ids ({} mint authorities)",
                portfolio.token_utxos, portfolio.unique_token_ids, portfolio.mint_authority_count
            ),
            action: "Fund plain payments only from strategy-selected inputs so token \
                     outputs are never burned"
                .to_string(),
            command_hint: Some("dustwatch select --strategy efficient".to_string()),
            impact: "Keeps token value out of plain-currency transactions".to_string(),
        });
    }

    recommendations.sort_by(|a, b| b.priority.weight().cmp(&a.priority.weight()));
    recommendations
}
