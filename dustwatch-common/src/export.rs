//! Export documents for `--export`
//!
//! Both documents carry a `format_version` and fixed snake_case field names
//! so that reports exported at different times stay diffable. Fields are only
//! ever added, behind `#[serde(default)]`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{DustwatchError, DustwatchResult, ErrorContext};
use crate::logging::{self, sanitize_for_logging, LogLevel};
use crate::portfolio::PortfolioSummary;
use crate::scoring::{
    AnalyticsCoverage, DustPattern, Recommendation, SecurityMetrics, SecurityReport,
    SecurityStatus, Threat,
};
use crate::types::ClassifiedUtxo;

/// Version of the export layout
pub const FORMAT_VERSION: u32 = 1;

/// Kind of exported document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Security,
    Classification,
}

/// Score, status and metrics of a security report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySummary {
    pub overall_score: u8,
    pub status: SecurityStatus,
    pub metrics: SecurityMetrics,
}

/// Exported security and health report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityReportDocument {
    pub format_version: u32,
    pub report_type: ReportType,
    pub wallet_address: String,
    /// RFC 3339, UTC
    pub generated_at: String,
    pub summary: SecuritySummary,
    pub threats: Vec<Threat>,
    pub recommendations: Vec<Recommendation>,
    pub token_portfolio: PortfolioSummary,
    #[serde(default)]
    pub dust_patterns: Vec<DustPattern>,
    pub analytics_coverage: AnalyticsCoverage,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl SecurityReportDocument {
    pub fn from_report(report: &SecurityReport) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            report_type: ReportType::Security,
            wallet_address: report.wallet_address.clone(),
            generated_at: timestamp(),
            summary: SecuritySummary {
                overall_score: report.overall_score,
                status: report.status,
                metrics: report.metrics.clone(),
            },
            threats: report.threats.clone(),
            recommendations: report.recommendations.clone(),
            token_portfolio: report.token_portfolio.clone(),
            dust_patterns: report.dust_patterns.clone(),
            analytics_coverage: report.analytics_coverage,
            warnings: report.warnings.clone(),
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> DustwatchResult<()> {
        write_document(self, path.as_ref(), &self.wallet_address)
    }
}

/// Exported per-output classification report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReportDocument {
    pub format_version: u32,
    pub report_type: ReportType,
    pub wallet_address: String,
    pub generated_at: String,
    pub summary: PortfolioSummary,
    pub utxos: Vec<ClassifiedUtxo>,
    pub threats: Vec<Threat>,
    pub recommendations: Vec<Recommendation>,
}

impl ClassificationReportDocument {
    /// Build from a classified snapshot and the report scored from it
    pub fn new(utxos: &[ClassifiedUtxo], report: &SecurityReport) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            report_type: ReportType::Classification,
            wallet_address: report.wallet_address.clone(),
            generated_at: timestamp(),
            summary: report.token_portfolio.clone(),
            utxos: utxos.to_vec(),
            threats: report.threats.clone(),
            recommendations: report.recommendations.clone(),
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> DustwatchResult<()> {
        write_document(self, path.as_ref(), &self.wallet_address)
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn write_document<T: Serialize>(
    document: &T,
    path: &Path,
    wallet_address: &str,
) -> DustwatchResult<()> {
    let file = File::create(path).map_err(|e| {
        DustwatchError::io(format!("Failed to create export file {}", path.display()), e)
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)
        .context(format!("Failed to write export {}", path.display()))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .context(format!("Failed to flush export {}", path.display()))?;

    logging::log_export(
        LogLevel::Info,
        "report exported",
        Some(json!({
            "path": path.display().to_string(),
            "wallet": sanitize_for_logging(wallet_address),
        })),
    );

    Ok(())
}
