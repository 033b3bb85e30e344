//! Standardized error handling for Dustwatch
//!
//! The engine's pure operations (classification, aggregation, scoring,
//! selection) do not fail: malformed input degrades to defaults. Errors only
//! arise at the edges, when configuration is loaded, a strategy name is
//! parsed, a snapshot is read or an export is written.
//!
//! # Usage
//!
//! ```
//! use dustwatch_common::error::{DustwatchError, ErrorContext};
//!
//! fn read_snapshot() -> Result<String, DustwatchError> {
//!     let text = std::fs::read_to_string("snapshot.json")
//!         .context("Failed to open UTXO snapshot")?;
//!     Ok(text)
//! }
//! ```

use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// The main error type for the Dustwatch engine
#[derive(Debug, Error)]
pub enum DustwatchError {
    /// Input rejected before any analysis runs (e.g. an unknown strategy name)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {context}")]
    Config {
        context: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// I/O errors
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        context: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Wallet client or analytics collaborator errors
    #[error("External API error: {context}")]
    ExternalApi {
        context: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

/// Type alias for a Result with DustwatchError
pub type DustwatchResult<T> = Result<T, DustwatchError>;

/// Extension trait for adding context to error types
pub trait ErrorContext<T, E> {
    /// Add human-readable context, keeping the original error as the source
    fn context(self, context: impl Into<String>) -> Result<T, E>;
}

impl<T, E: Into<DustwatchError>> ErrorContext<T, DustwatchError> for Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T, DustwatchError> {
        self.map_err(|err| match err.into() {
            DustwatchError::Config { source, .. } => DustwatchError::Config {
                context: context.into(),
                source,
            },
            DustwatchError::Io { source, .. } => DustwatchError::Io {
                context: context.into(),
                source,
            },
            DustwatchError::Serialization { source, .. } => DustwatchError::Serialization {
                context: context.into(),
                source,
            },
            DustwatchError::ExternalApi { source, .. } => DustwatchError::ExternalApi {
                context: context.into(),
                source,
            },
            DustwatchError::Validation(message) => {
                DustwatchError::Validation(format!("{}: {}", context.into(), message))
            }
        })
    }
}

impl From<io::Error> for DustwatchError {
    fn from(err: io::Error) -> Self {
        DustwatchError::Io {
            context: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for DustwatchError {
    fn from(err: serde_json::Error) -> Self {
        DustwatchError::Serialization {
            context: format!("JSON serialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for DustwatchError {
    fn from(err: toml::de::Error) -> Self {
        DustwatchError::Serialization {
            context: format!("TOML deserialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::ser::Error> for DustwatchError {
    fn from(err: toml::ser::Error) -> Self {
        DustwatchError::Serialization {
            context: format!("TOML serialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<crate::analytics::AnalyticsError> for DustwatchError {
    fn from(err: crate::analytics::AnalyticsError) -> Self {
        DustwatchError::ExternalApi {
            context: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<crate::wallet_client::WalletClientError> for DustwatchError {
    fn from(err: crate::wallet_client::WalletClientError) -> Self {
        DustwatchError::ExternalApi {
            context: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<crate::selection::types::StrategyParseError> for DustwatchError {
    fn from(err: crate::selection::types::StrategyParseError) -> Self {
        DustwatchError::Validation(err.to_string())
    }
}

/// Create a new configuration error with context
pub fn config_error<S: Into<String>>(context: S) -> DustwatchError {
    DustwatchError::Config {
        context: context.into(),
        source: None,
    }
}

/// Create a new configuration error with context and source
pub fn config_error_with_source<S: Into<String>, E: StdError + Send + Sync + 'static>(
    context: S,
    source: E,
) -> DustwatchError {
    DustwatchError::Config {
        context: context.into(),
        source: Some(Box::new(source)),
    }
}

/// Broad error category, used to pick a process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Config,
    Io,
    Serialization,
    ExternalApi,
}

impl DustwatchError {
    /// Get the category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            DustwatchError::Validation(_) => ErrorCategory::Validation,
            DustwatchError::Config { .. } => ErrorCategory::Config,
            DustwatchError::Io { .. } => ErrorCategory::Io,
            DustwatchError::Serialization { .. } => ErrorCategory::Serialization,
            DustwatchError::ExternalApi { .. } => ErrorCategory::ExternalApi,
        }
    }

    /// Message suitable for showing to a user
    pub fn user_message(&self) -> String {
        match self {
            DustwatchError::Validation(message) => format!("Invalid input: {}", message),
            DustwatchError::Config { context, .. } => format!("Configuration error: {}", context),
            DustwatchError::Io { context, .. } => format!("File operation error: {}", context),
            DustwatchError::Serialization { context, .. } => {
                format!("Data format error: {}", context)
            }
            DustwatchError::ExternalApi { context, .. } => {
                format!("Wallet service error: {}", context)
            }
        }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(context: S, source: io::Error) -> Self {
        DustwatchError::Io {
            context: context.into(),
            source,
        }
    }
}
