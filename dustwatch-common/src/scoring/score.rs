use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ScoreWeights;

/// Overall wallet status derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityStatus {
    Secure,
    Good,
    Moderate,
    AtRisk,
    Critical,
}

impl SecurityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityStatus::Secure => "secure",
            SecurityStatus::Good => "good",
            SecurityStatus::Moderate => "moderate",
            SecurityStatus::AtRisk => "at_risk",
            SecurityStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for SecurityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `part` as a percentage of `total`; zero when `total` is zero
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

/// Composite score between 0 and 100
///
/// `healthy_ratio` is a fraction (0..=1); `dust_ratio` and `suspicious_ratio`
/// are percentages of the total output count.
pub fn composite_score(
    privacy_score: f64,
    healthy_ratio: f64,
    dust_ratio: f64,
    suspicious_ratio: f64,
    weights: &ScoreWeights,
) -> f64 {
    let privacy = weights.privacy * privacy_score;
    let health = weights.health * healthy_ratio * 100.0;
    let dust = weights.dust * (100.0 - dust_ratio * weights.dust_penalty).max(0.0);
    let suspicious =
        weights.suspicious * (100.0 - suspicious_ratio * weights.suspicious_penalty).max(0.0);

    let total = privacy + health + dust + suspicious;
    if total.is_nan() {
        return 0.0;
    }
    total.clamp(0.0, 100.0)
}

/// Status band for a composite score
///
/// Banding uses the unrounded composite, so 84.6 is still `Good` even though
/// it is reported as 85.
pub fn status_for_score(score: f64) -> SecurityStatus {
    if score < 30.0 {
        SecurityStatus::Critical
    } else if score < 50.0 {
        SecurityStatus::AtRisk
    } else if score < 70.0 {
        SecurityStatus::Moderate
    } else if score < 85.0 {
        SecurityStatus::Good
    } else {
        SecurityStatus::Secure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_wallet_scores_hundred() {
        let score = composite_score(100.0, 1.0, 0.0, 0.0, &ScoreWeights::default());
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn penalties_floor_at_zero() {
        // 60% dust * 2 and 30% suspicious * 4 both exceed 100
        let score = composite_score(0.0, 0.0, 60.0, 30.0, &ScoreWeights::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn default_privacy_alone() {
        let score = composite_score(50.0, 0.0, 0.0, 0.0, &ScoreWeights::default());
        // 20 + 0 + 20 + 10
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn status_band_edges() {
        assert_eq!(status_for_score(0.0), SecurityStatus::Critical);
        assert_eq!(status_for_score(29.9), SecurityStatus::Critical);
        assert_eq!(status_for_score(30.0), SecurityStatus::AtRisk);
        assert_eq!(status_for_score(49.9), SecurityStatus::AtRisk);
        assert_eq!(status_for_score(50.0), SecurityStatus::Moderate);
        assert_eq!(status_for_score(69.9), SecurityStatus::Moderate);
        assert_eq!(status_for_score(70.0), SecurityStatus::Good);
        assert_eq!(status_for_score(84.6), SecurityStatus::Good);
        assert_eq!(status_for_score(84.99), SecurityStatus::Good);
        assert_eq!(status_for_score(85.0), SecurityStatus::Secure);
        assert_eq!(status_for_score(100.0), SecurityStatus::Secure);
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }
}
