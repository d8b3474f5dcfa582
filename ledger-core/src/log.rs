//! Append-only settlement log

use crate::types::{Currency, Settlement};
use serde::{Deserialize, Serialize};

/// Confirmed settlements, in the order they were recorded
///
/// Entries are never modified or removed; a mistaken payment is undone by
/// recording the reverse payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementLog {
    settlements: Vec<Settlement>,
}

impl SettlementLog {
    /// Create empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a settlement
    pub fn append(&mut self, settlement: Settlement) {
        tracing::info!(
            "Recorded settlement {}: {} → {} {} {}",
            settlement.settlement_id,
            settlement.from,
            settlement.to,
            settlement.amount,
            settlement.currency
        );
        self.settlements.push(settlement);
    }

    /// All settlements in recording order
    pub fn as_slice(&self) -> &[Settlement] {
        &self.settlements
    }

    /// Iterate over settlements
    pub fn iter(&self) -> impl Iterator<Item = &Settlement> {
        self.settlements.iter()
    }

    /// Settlements in one currency
    pub fn for_currency<'a>(
        &'a self,
        currency: &'a Currency,
    ) -> impl Iterator<Item = &'a Settlement> + 'a {
        self.settlements.iter().filter(move |s| &s.currency == currency)
    }

    /// Number of settlements
    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }
}

impl From<Vec<Settlement>> for SettlementLog {
    fn from(settlements: Vec<Settlement>) -> Self {
        Self { settlements }
    }
}

impl Extend<Settlement> for SettlementLog {
    fn extend<I: IntoIterator<Item = Settlement>>(&mut self, iter: I) {
        for settlement in iter {
            self.append(settlement);
        }
    }
}
