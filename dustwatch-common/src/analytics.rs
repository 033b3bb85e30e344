//! External analytics collaborator
//!
//! Per-output privacy scores and suspicious-activity judgments come from an
//! analytics service outside the engine. Every call is fallible and
//! optional: the scorer falls back to conservative defaults (privacy 50,
//! status `Unknown`) when a call fails or the service is absent altogether.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::types::{ClassifiedUtxo, HealthStatus, OutPointRef};

/// Errors reported by an analytics collaborator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The service cannot be reached or is not configured
    #[error("Analytics service unavailable: {0}")]
    Unavailable(String),

    /// The service answered but could not assess this output
    #[error("Analytics lookup failed: {0}")]
    Failed(String),
}

/// Source of per-output privacy scores and health judgments
pub trait UtxoAnalytics {
    /// Privacy score between 0 and 100, `None` when the service has no opinion
    fn privacy_score(&self, utxo: &ClassifiedUtxo) -> Result<Option<u8>, AnalyticsError>;

    /// Health judgment, `None` when the service has no opinion
    fn health_judgment(
        &self,
        utxo: &ClassifiedUtxo,
    ) -> Result<Option<HealthStatus>, AnalyticsError>;
}

/// Analytics collaborator used when no service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnalytics;

impl UtxoAnalytics for NoAnalytics {
    fn privacy_score(&self, _utxo: &ClassifiedUtxo) -> Result<Option<u8>, AnalyticsError> {
        Err(AnalyticsError::Unavailable("no analytics service configured".to_string()))
    }

    fn health_judgment(
        &self,
        _utxo: &ClassifiedUtxo,
    ) -> Result<Option<HealthStatus>, AnalyticsError> {
        Err(AnalyticsError::Unavailable("no analytics service configured".to_string()))
    }
}

/// Analytics entry for one output, as stored in a snapshot file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub tx_id: String,
    pub output_index: u32,
    #[serde(default)]
    pub privacy_score: Option<u8>,
    #[serde(default)]
    pub status: Option<HealthStatus>,
}

/// Precomputed analytics keyed by outpoint
///
/// Outputs without an entry get `Ok(None)` from both calls.
#[derive(Debug, Clone, Default)]
pub struct StaticAnalytics {
    entries: HashMap<OutPointRef, AnalyticsRecord>,
}

impl StaticAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = AnalyticsRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|r| (OutPointRef::new(r.tx_id.clone(), r.output_index), r))
            .collect();
        Self { entries }
    }

    pub fn with_privacy_score(mut self, outpoint: OutPointRef, score: u8) -> Self {
        self.entry(outpoint).privacy_score = Some(score);
        self
    }

    pub fn with_status(mut self, outpoint: OutPointRef, status: HealthStatus) -> Self {
        self.entry(outpoint).status = Some(status);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&mut self, outpoint: OutPointRef) -> &mut AnalyticsRecord {
        self.entries
            .entry(outpoint.clone())
            .or_insert_with(|| AnalyticsRecord {
                tx_id: outpoint.tx_id,
                output_index: outpoint.output_index,
                privacy_score: None,
                status: None,
            })
    }
}

impl UtxoAnalytics for StaticAnalytics {
    fn privacy_score(&self, utxo: &ClassifiedUtxo) -> Result<Option<u8>, AnalyticsError> {
        match self.entries.get(&utxo.outpoint()).and_then(|r| r.privacy_score) {
            Some(score) if score > 100 => Err(AnalyticsError::Failed(format!(
                "privacy score {} out of range",
                score
            ))),
            score => Ok(score),
        }
    }

    fn health_judgment(
        &self,
        utxo: &ClassifiedUtxo,
    ) -> Result<Option<HealthStatus>, AnalyticsError> {
        Ok(self.entries.get(&utxo.outpoint()).and_then(|r| r.status))
    }
}
