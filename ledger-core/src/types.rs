//! Core types for shared expenses and balances

use crate::{config::DEFAULT_TOLERANCE, Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Participant identifier (stable within a participant set)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create new participant ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Person taking part in a split, supplied by the contacts layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID
    pub id: ParticipantId,

    /// Name shown to the user
    pub display_name: String,
}

impl Participant {
    /// Create new participant
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(id),
            display_name: display_name.into(),
        }
    }
}

/// Currency code (ISO-like, stored upper-case)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Parse a currency code, normalising case
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidCurrency(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Currency code
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Currency {
    type Error = Error;

    fn try_from(code: String) -> Result<Self> {
        Currency::new(&code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

/// How owed amounts are derived for a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Total divided evenly
    #[default]
    Equal,
    /// Weighted by percentage strings
    Percentage,
    /// Weighted by share units
    Shares,
    /// Amounts entered directly
    Manual,
}

/// One participant's portion of one expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    /// Participant who owes this portion
    pub participant: ParticipantId,

    /// Amount owed (>= 0)
    pub owed_amount: Decimal,

    /// Raw percentage (percentage mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<String>,

    /// Share units (shares mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_units: Option<Decimal>,

    /// Already paid outside the netting engine
    #[serde(default)]
    pub is_settled: bool,
}

impl SplitShare {
    /// Create an unsettled share with no mode-specific inputs
    pub fn new(participant: impl Into<ParticipantId>, owed_amount: Decimal) -> Self {
        Self {
            participant: participant.into(),
            owed_amount,
            percentage: None,
            share_units: None,
            is_settled: false,
        }
    }

    /// Mark the share as paid outside netting
    pub fn settled(mut self) -> Self {
        self.is_settled = true;
        self
    }
}

/// Amount one participant paid towards an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    /// Paying participant
    pub participant: ParticipantId,

    /// Amount paid
    pub amount_paid: Decimal,
}

impl Payer {
    /// Create new payer entry
    pub fn new(participant: impl Into<ParticipantId>, amount_paid: Decimal) -> Self {
        Self {
            participant: participant.into(),
            amount_paid,
        }
    }
}

/// A single shared cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID
    pub id: Uuid,

    /// Total amount (sum of payers)
    pub total_amount: Decimal,

    /// Currency
    pub currency: Currency,

    /// Who paid, in entry order
    pub payers: Vec<Payer>,

    /// Who owes what
    pub split: Vec<SplitShare>,
}

impl Expense {
    /// Create an expense whose total is the sum of what the payers paid
    pub fn new(
        id: Uuid,
        currency: Currency,
        payers: Vec<Payer>,
        split: Vec<SplitShare>,
    ) -> Result<Self> {
        let total_amount = payers.iter().map(|p| p.amount_paid).sum();
        Self::with_total(id, total_amount, currency, payers, split)
    }

    /// Create an expense with an explicit total, checked against payers and split
    pub fn with_total(
        id: Uuid,
        total_amount: Decimal,
        currency: Currency,
        payers: Vec<Payer>,
        split: Vec<SplitShare>,
    ) -> Result<Self> {
        let expense = Self {
            id,
            total_amount,
            currency,
            payers,
            split,
        };
        expense.validate(DEFAULT_TOLERANCE)?;
        Ok(expense)
    }

    /// Check the expense invariants against a tolerance
    pub fn validate(&self, tolerance: Decimal) -> Result<()> {
        if self.total_amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(self.total_amount));
        }
        if self.payers.is_empty() {
            return Err(Error::NoParticipants);
        }
        if let Some(payer) = self.payers.iter().find(|p| p.amount_paid <= Decimal::ZERO) {
            return Err(Error::InvalidAmount(payer.amount_paid));
        }

        let paid = self.total_paid();
        if paid != self.total_amount {
            return Err(Error::UnbalancedPayers {
                total: self.total_amount,
                paid,
            });
        }

        if let Some(share) = self.split.iter().find(|s| s.owed_amount < Decimal::ZERO) {
            return Err(Error::InvalidAmount(share.owed_amount));
        }
        let remaining = self.total_amount - self.total_owed();
        if remaining.abs() > tolerance {
            return Err(Error::UnbalancedSplit { remaining });
        }

        Ok(())
    }

    /// Sum of payer amounts
    pub fn total_paid(&self) -> Decimal {
        self.payers.iter().map(|p| p.amount_paid).sum()
    }

    /// Sum of owed amounts
    pub fn total_owed(&self) -> Decimal {
        self.split.iter().map(|s| s.owed_amount).sum()
    }
}

/// Direct payment between two participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Settlement ID
    pub settlement_id: Uuid,

    /// Participant who paid
    pub from: ParticipantId,

    /// Participant who received
    pub to: ParticipantId,

    /// Amount paid
    pub amount: Decimal,

    /// Currency
    pub currency: Currency,

    /// When the payment was made
    pub timestamp: DateTime<Utc>,
}

impl Settlement {
    /// Record a payment from one participant to another
    pub fn record(
        from: ParticipantId,
        to: ParticipantId,
        amount: Decimal,
        currency: Currency,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let settlement = Self {
            settlement_id: Uuid::new_v4(),
            from,
            to,
            amount,
            currency,
            timestamp,
        };
        settlement.validate()?;
        Ok(settlement)
    }

    /// Check that the amount is positive and the parties differ
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(self.amount));
        }
        if self.from == self.to {
            return Err(Error::SelfSettlement(self.from.clone()));
        }
        Ok(())
    }
}

/// Net position of one participant in one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBalance {
    /// Participant ID
    pub participant: ParticipantId,

    /// Currency
    pub currency: Currency,

    /// Net amount (positive = is owed money, negative = owes money)
    pub amount: Decimal,
}

impl NetBalance {
    /// Create new balance entry
    pub fn new(participant: impl Into<ParticipantId>, currency: Currency, amount: Decimal) -> Self {
        Self {
            participant: participant.into(),
            currency,
            amount,
        }
    }

    /// Check if net creditor (is owed money)
    pub fn is_creditor(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Check if net debtor (owes money)
    pub fn is_debtor(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Get absolute amount
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }
}
