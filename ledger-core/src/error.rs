//! Error types for split allocation and the balance ledger

use crate::types::ParticipantId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Non-positive expense or settlement amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// No participants supplied to a computed split
    #[error("No participants")]
    NoParticipants,

    /// Manual split does not add up to the total
    #[error("Unbalanced split: remaining {remaining}")]
    UnbalancedSplit {
        /// Total minus the sum of owed amounts (signed)
        remaining: Decimal,
    },

    /// Payer amounts do not add up to the expense total
    #[error("Unbalanced payers: total {total}, paid {paid}")]
    UnbalancedPayers {
        /// Declared expense total
        total: Decimal,
        /// Sum of payer amounts
        paid: Decimal,
    },

    /// Raw split input could not be used
    #[error("Invalid input for {participant}: {value:?}")]
    InvalidInput {
        /// Participant the input belongs to
        participant: ParticipantId,
        /// Raw value as entered
        value: String,
    },

    /// Participant listed more than once in one split
    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(ParticipantId),

    /// Settlement from a participant to themselves
    #[error("Settlement from {0} to itself")]
    SelfSettlement(ParticipantId),

    /// Empty or malformed currency code
    #[error("Invalid currency: {0:?}")]
    InvalidCurrency(String),
}
