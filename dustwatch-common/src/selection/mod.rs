//! Token-safe input selection
//!
//! Given a classified snapshot and a [`SpendStrategy`], returns the
//! plain-currency outputs eligible to fund a transaction. The selection is
//! a filter, not a coin-selection algorithm: building and signing the
//! transaction from these inputs is the wallet client's job.
//!
//! | Strategy    | Excludes                         |
//! |-------------|----------------------------------|
//! | `efficient` | tokens, dust                     |
//! | `privacy`   | tokens, dust, values `<= 546`    |
//! | `security`  | tokens, dust, values `<= 1000`   |
//!
//! Token-bearing and mint-authority outputs are excluded by every strategy.

pub mod selector;
pub mod types;

pub use selector::select_for_strategy;
pub use types::{
    SelectionStats, SelectionWarning, SpendStrategy, StrategyParseError, StrategySelection,
};
