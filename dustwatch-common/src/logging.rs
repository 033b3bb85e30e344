//! Structured logging for the Dustwatch engine
//!
//! Logging goes through the `log` facade and is backed by `env_logger`.
//! Wallet addresses and transaction ids are truncated before they reach a
//! log line, so a shared log never maps one-to-one onto a wallet.
//!
//! # Usage
//!
//! ```
//! use dustwatch_common::logging::{self, LogConfig, LogLevel};
//! use serde_json::json;
//!
//! logging::init(&LogConfig::default()).expect("Failed to initialize logging");
//!
//! logging::log_scoring(
//!     LogLevel::Info,
//!     "report built",
//!     Some(json!({ "threats": 0 })),
//! );
//! ```

use chrono::Local;
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write as IoWrite;
use std::sync::Once;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Engine area a log event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogContext {
    /// Per-output classification and token extraction
    Classification,
    /// Threat detection and composite scoring
    Scoring,
    /// Strategy-based input selection
    Selection,
    /// Calls out to the wallet client or analytics collaborator
    Enrichment,
    /// Report documents written to disk
    Export,
    /// Configuration loading and validation
    Config,
}

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default log level
    #[serde(default = "default_level")]
    pub level: LogLevel,
    /// Path to log file (None for console-only)
    #[serde(default)]
    pub log_file: Option<String>,
    /// Whether to include timestamps in log messages
    #[serde(default = "default_true")]
    pub include_timestamps: bool,
    /// Whether to include source location in log messages
    #[serde(default)]
    pub include_source_location: bool,
    /// Whether to use JSON format for logs (machine-readable)
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_file: None,
            include_timestamps: true,
            include_source_location: false,
            json_format: false,
        }
    }
}

fn default_level() -> LogLevel {
    LogLevel::Info
}

fn default_true() -> bool {
    true
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

static LOGGING_INIT: Once = Once::new();

/// Initialize the logging system with the given configuration
///
/// Safe to call more than once; only the first call configures the logger.
/// Returns an error only when the first call cannot open the log file.
pub fn init(config: &LogConfig) -> Result<(), String> {
    let mut result = Ok(());

    let include_timestamps = config.include_timestamps;
    let include_source_location = config.include_source_location;
    let json_format = config.json_format;
    let log_file = config.log_file.clone();
    let level = config.level;

    LOGGING_INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(level.into());

        builder.format(move |buf, record| {
            let timestamp = if include_timestamps {
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
            } else {
                String::new()
            };

            let source_location = if include_source_location {
                format!(
                    " [{}:{}]",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0)
                )
            } else {
                String::new()
            };

            if json_format {
                let line = json!({
                    "timestamp": timestamp,
                    "level": record.level().to_string(),
                    "target": record.target(),
                    "location": source_location,
                    "message": record.args().to_string(),
                });
                writeln!(buf, "{}", line)
            } else {
                if include_timestamps {
                    write!(buf, "{} ", timestamp)?;
                }
                writeln!(
                    buf,
                    "[{}{}] {}",
                    record.level(),
                    source_location,
                    record.args()
                )
            }
        });

        if let Some(file_path) = &log_file {
            match OpenOptions::new().create(true).append(true).open(file_path) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(e) => {
                    result = Err(format!("Failed to open log file {}: {}", file_path, e));
                    return;
                }
            }
        }

        // Another logger (e.g. from a test harness) may already be installed
        if let Err(e) = builder.try_init() {
            debug!("Logger already initialized: {}", e);
        }
    });

    result
}

/// Truncate a potentially identifying string for logging
///
/// Keeps the first and last four characters of long values and masks short
/// ones completely.
pub fn sanitize_for_logging(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= 8 {
        return "*****".to_string();
    }

    let first: String = chars[..4].iter().collect();
    let last: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", first, last)
}

fn log_with_context(
    level: LogLevel,
    context: LogContext,
    message: &str,
    params: Option<serde_json::Value>,
) {
    let level: log::Level = level.into();
    match params {
        Some(params) => log::log!(level, "[{:?}] {} {}", context, message, params),
        None => log::log!(level, "[{:?}] {}", context, message),
    }
}

/// Log a classification event
pub fn log_classification(level: LogLevel, message: &str, params: Option<serde_json::Value>) {
    log_with_context(level, LogContext::Classification, message, params);
}

/// Log a scoring event
pub fn log_scoring(level: LogLevel, message: &str, params: Option<serde_json::Value>) {
    log_with_context(level, LogContext::Scoring, message, params);
}

/// Log a selection event
pub fn log_selection(level: LogLevel, message: &str, params: Option<serde_json::Value>) {
    log_with_context(level, LogContext::Selection, message, params);
}

/// Log an enrichment event (wallet client / analytics calls)
pub fn log_enrichment(level: LogLevel, message: &str, params: Option<serde_json::Value>) {
    log_with_context(level, LogContext::Enrichment, message, params);
}

/// Log an export event
pub fn log_export(level: LogLevel, message: &str, params: Option<serde_json::Value>) {
    log_with_context(level, LogContext::Export, message, params);
}

/// Log a configuration event
pub fn log_config(level: LogLevel, message: &str, params: Option<serde_json::Value>) {
    log_with_context(level, LogContext::Config, message, params);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_values_keep_both_ends() {
        assert_eq!(
            sanitize_for_logging("ecash:qz2708636snqhsxu8wnlka78h6fdp77ar59jrf5035"),
            "ecas...5035"
        );
    }

    #[test]
    fn short_values_are_masked() {
        assert_eq!(sanitize_for_logging("abc"), "*****");
        assert_eq!(sanitize_for_logging(""), "");
    }
}
