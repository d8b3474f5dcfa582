//! Error types for the settlement engine

use tally_ledger::Currency;
use thiserror::Error;
use uuid::Uuid;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error (allocation, expense or settlement validation)
    #[error("Ledger error: {0}")]
    Ledger(#[from] tally_ledger::Error),

    /// Netting invoked across currencies
    #[error("Mixed currencies: expected {expected}, found {found}")]
    MixedCurrency {
        /// Currency of the first balance
        expected: Currency,
        /// First balance in another currency
        found: Currency,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Scenario expense or settlement failed validation
    #[error("Invalid record {id}: {source}")]
    InvalidRecord {
        /// Expense or settlement ID
        id: Uuid,
        /// Validation failure
        source: tally_ledger::Error,
    },

    /// Scenario JSON could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
