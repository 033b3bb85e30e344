//! Configuration for the Dustwatch engine.
//!
//! Every threshold the classifier, scorer and selector use lives here and is
//! passed to them explicitly. Settings are stored as TOML; every field has a
//! default, so a partial file (or no file at all) is valid.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{config_error, config_error_with_source};
use crate::logging::{self, LogConfig, LogLevel};
use crate::types::{DUST_THRESHOLD, LARGE_THRESHOLD};

// Every failure here is a `DustwatchError::Config`, so callers can tell a
// rejected configuration apart from a failed analysis.
macro_rules! bail_config {
    ($($arg:tt)*) => {
        return Err(config_error(format!($($arg)*)).into())
    };
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

/// Value thresholds used by the classifier and the strategy selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Values at or below this are dust
    #[serde(default = "default_dust_threshold")]
    pub dust_threshold: u64,

    /// Values at or above this are large
    #[serde(default = "default_large_threshold")]
    pub large_threshold: u64,

    /// Values at or below `dust_threshold * change_like_multiplier` look like change
    #[serde(default = "default_change_like_multiplier")]
    pub change_like_multiplier: u64,

    /// Security strategy only spends values strictly above this
    #[serde(default = "default_security_min_value")]
    pub security_min_value: u64,

    /// Privacy strategy only spends values strictly above this
    #[serde(default = "default_privacy_min_value")]
    pub privacy_min_value: u64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            dust_threshold: default_dust_threshold(),
            large_threshold: default_large_threshold(),
            change_like_multiplier: default_change_like_multiplier(),
            security_min_value: default_security_min_value(),
            privacy_min_value: default_privacy_min_value(),
        }
    }
}

impl ClassificationConfig {
    /// Upper bound (inclusive) of the change-like band
    pub fn change_like_ceiling(&self) -> u64 {
        self.dust_threshold.saturating_mul(self.change_like_multiplier)
    }
}

/// Detector thresholds and composite score weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Pure-dust outputs needed for a dust-attack threat
    #[serde(default = "default_dust_attack_count")]
    pub dust_attack_count: usize,

    /// Dust outputs sharing one value needed for a pattern note
    #[serde(default = "default_dust_pattern_count")]
    pub dust_pattern_count: usize,

    /// Dust outputs sharing one value needed for a systematic-dust threat
    #[serde(default = "default_systematic_dust_count")]
    pub systematic_dust_count: usize,

    /// Average privacy score below which a low-privacy threat fires
    #[serde(default = "default_low_privacy_threshold")]
    pub low_privacy_threshold: f64,

    /// Privacy score assumed when the analytics collaborator supplies none
    #[serde(default = "default_privacy_score")]
    pub default_privacy_score: u8,

    /// Round-valued outputs needed for a round-number threat
    #[serde(default = "default_round_number_count")]
    pub round_number_count: usize,

    /// Values whose exact multiples count as round
    #[serde(default = "default_round_denominations")]
    pub round_denominations: Vec<u64>,

    /// Suspicious outputs at which the threat becomes high severity
    #[serde(default = "default_suspicious_high_count")]
    pub suspicious_high_count: usize,

    /// Unconfirmed outputs needed for an unconfirmed-accumulation threat
    #[serde(default = "default_unconfirmed_count")]
    pub unconfirmed_count: usize,

    /// Outputs on one address needed for an address-concentration threat
    #[serde(default = "default_address_concentration_count")]
    pub address_concentration_count: usize,

    #[serde(default)]
    pub weights: ScoreWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            dust_attack_count: default_dust_attack_count(),
            dust_pattern_count: default_dust_pattern_count(),
            systematic_dust_count: default_systematic_dust_count(),
            low_privacy_threshold: default_low_privacy_threshold(),
            default_privacy_score: default_privacy_score(),
            round_number_count: default_round_number_count(),
            round_denominations: default_round_denominations(),
            suspicious_high_count: default_suspicious_high_count(),
            unconfirmed_count: default_unconfirmed_count(),
            address_concentration_count: default_address_concentration_count(),
            weights: ScoreWeights::default(),
        }
    }
}

/// Weights of the composite security score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_privacy_weight")]
    pub privacy: f64,

    #[serde(default = "default_health_weight")]
    pub health: f64,

    #[serde(default = "default_dust_weight")]
    pub dust: f64,

    #[serde(default = "default_suspicious_weight")]
    pub suspicious: f64,

    /// Penalty per percentage point of dust
    #[serde(default = "default_dust_penalty")]
    pub dust_penalty: f64,

    /// Penalty per percentage point of suspicious outputs
    #[serde(default = "default_suspicious_penalty")]
    pub suspicious_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            privacy: default_privacy_weight(),
            health: default_health_weight(),
            dust: default_dust_weight(),
            suspicious: default_suspicious_weight(),
            dust_penalty: default_dust_penalty(),
            suspicious_penalty: default_suspicious_penalty(),
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.privacy + self.health + self.dust + self.suspicious
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            config_error_with_source(
                format!("Failed to read config file {}: {}", path.display(), e),
                e,
            )
        })?;

        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            config_error_with_source(format!("Failed to parse config file: {}", e), e)
        })?;

        config.validate()?;

        logging::log_config(
            LogLevel::Debug,
            "configuration loaded",
            Some(json!({ "path": path.display().to_string() })),
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            config_error_with_source(format!("Failed to serialize config: {}", e), e)
        })?;

        fs::write(path.as_ref(), content).map_err(|e| {
            config_error_with_source(format!("Failed to write config file: {}", e), e)
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let classification = &self.classification;
        if classification.change_like_multiplier == 0 {
            bail_config!("Invalid change_like_multiplier: must be greater than 0");
        }
        if classification.dust_threshold >= classification.large_threshold {
            bail_config!(
                "Invalid thresholds: dust_threshold ({}) must be below large_threshold ({})",
                classification.dust_threshold,
                classification.large_threshold
            );
        }

        let scoring = &self.scoring;
        let counts = [
            ("dust_attack_count", scoring.dust_attack_count),
            ("dust_pattern_count", scoring.dust_pattern_count),
            ("systematic_dust_count", scoring.systematic_dust_count),
            ("round_number_count", scoring.round_number_count),
            ("suspicious_high_count", scoring.suspicious_high_count),
            ("unconfirmed_count", scoring.unconfirmed_count),
            ("address_concentration_count", scoring.address_concentration_count),
        ];
        for (name, count) in counts {
            if count == 0 {
                bail_config!("Invalid {}: must be greater than 0", name);
            }
        }

        if scoring.dust_pattern_count > scoring.systematic_dust_count {
            bail_config!("Invalid dust_pattern_count: must not exceed systematic_dust_count");
        }

        if !(0.0..=100.0).contains(&scoring.low_privacy_threshold) {
            bail_config!("Invalid low_privacy_threshold: must be between 0 and 100");
        }

        if scoring.default_privacy_score > 100 {
            bail_config!("Invalid default_privacy_score: must be between 0 and 100");
        }

        if scoring.round_denominations.iter().any(|d| *d == 0) {
            bail_config!("Invalid round_denominations: values must be greater than 0");
        }

        let weights = &scoring.weights;
        let all_weights = [
            weights.privacy,
            weights.health,
            weights.dust,
            weights.suspicious,
            weights.dust_penalty,
            weights.suspicious_penalty,
        ];
        if all_weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            bail_config!("Invalid score weights: must be finite and non-negative");
        }
        if (weights.total() - 1.0).abs() > 1e-6 {
            bail_config!(
                "Invalid score weights: privacy, health, dust and suspicious must sum to 1.0 (got {})",
                weights.total()
            );
        }

        Ok(())
    }
}

/// Default location of the configuration file
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dustwatch")
        .join("config.toml")
}

/// Ensure a configuration file exists at the specified path
/// If it doesn't exist, create it with default values
pub fn ensure_config_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    config_error_with_source(
                        format!("Failed to create config directory: {}", e),
                        e,
                    )
                })?;
            }
        }

        EngineConfig::default().save(path)?;
    }

    Ok(())
}

// Default value functions

fn default_dust_threshold() -> u64 {
    DUST_THRESHOLD
}

fn default_large_threshold() -> u64 {
    LARGE_THRESHOLD
}

fn default_change_like_multiplier() -> u64 {
    2
}

fn default_security_min_value() -> u64 {
    1000
}

fn default_privacy_min_value() -> u64 {
    DUST_THRESHOLD
}

fn default_dust_attack_count() -> usize {
    5
}

fn default_dust_pattern_count() -> usize {
    3
}

fn default_systematic_dust_count() -> usize {
    5
}

fn default_low_privacy_threshold() -> f64 {
    40.0
}

fn default_privacy_score() -> u8 {
    50
}

fn default_round_number_count() -> usize {
    3
}

fn default_round_denominations() -> Vec<u64> {
    vec![10_000, 50_000, 100_000]
}

fn default_suspicious_high_count() -> usize {
    5
}

fn default_unconfirmed_count() -> usize {
    10
}

fn default_address_concentration_count() -> usize {
    50
}

fn default_privacy_weight() -> f64 {
    0.4
}

fn default_health_weight() -> f64 {
    0.3
}

fn default_dust_weight() -> f64 {
    0.2
}

fn default_suspicious_weight() -> f64 {
    0.1
}

fn default_dust_penalty() -> f64 {
    2.0
}

fn default_suspicious_penalty() -> f64 {
    4.0
}
