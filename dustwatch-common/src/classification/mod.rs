//! UTXO classification module
//!
//! Maps each raw output to exactly one [`UtxoType`](crate::types::UtxoType)
//! and a default [`HealthAssessment`](crate::types::HealthAssessment).
//!
//! - `token.rs` - validates token attachments (the token extractor)
//! - `classifier.rs` - value/token based type and health derivation
//!
//! Classification is total. Malformed token data is logged and treated as
//! absent; it never aborts an analysis.
//!
//! # Example
//!
//! ```
//! use dustwatch_common::classification::classify;
//! use dustwatch_common::config::ClassificationConfig;
//! use dustwatch_common::types::{RawUtxo, UtxoType};
//!
//! let config = ClassificationConfig::default();
//! let utxo = RawUtxo::new("aa".repeat(32), 0, 546);
//! assert_eq!(classify(&utxo, &config).utxo_type(), UtxoType::PureDust);
//! ```

pub mod classifier;
pub mod token;

pub use classifier::{assess_health, classify, classify_all, determine_type};
pub use token::{extract_token, is_valid_token_id, parse_token_amount};
