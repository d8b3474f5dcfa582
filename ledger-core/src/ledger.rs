//! Balance ledger
//!
//! Aggregates expenses and settlements in one currency into per-participant
//! net balances (paid minus owed).
//!
//! # Invariants
//!
//! - Zero-sum: Σ(balances) == 0 whenever every expense's split sums to its total
//! - Currency isolation: one run only ever reads entries in its own currency
//! - Settled participants (balance exactly 0) are omitted
//!
//! # Example
//!
//! ```text
//! A pays 90.00, split equally between A, B, C
//!   A: +90.00 - 30.00 = +60.00
//!   B:         -30.00 = -30.00
//!   C:         -30.00 = -30.00
//!
//! B settles 10.00 with A
//!   A: +50.00   B: -20.00   C: -30.00
//! ```

use crate::{
    allocator::distribute,
    config::DEFAULT_MINOR_UNITS,
    types::{Currency, Expense, NetBalance, ParticipantId, Settlement},
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Balance ledger
#[derive(Debug, Clone)]
pub struct BalanceLedger {
    /// Decimal places of the smallest currency unit
    minor_units: u32,
}

impl Default for BalanceLedger {
    fn default() -> Self {
        Self::new(DEFAULT_MINOR_UNITS)
    }
}

impl BalanceLedger {
    /// Create new balance ledger
    pub fn new(minor_units: u32) -> Self {
        Self { minor_units }
    }

    /// Net balances for one currency, in first-appearance order
    pub fn compute_balances(
        &self,
        expenses: &[Expense],
        settlements: &[Settlement],
        currency: &Currency,
    ) -> Vec<NetBalance> {
        let mut positions = Positions::default();
        let mut expense_count = 0usize;

        for expense in expenses.iter().filter(|e| &e.currency == currency) {
            expense_count += 1;
            self.apply_expense(&mut positions, expense);
        }

        let mut settlement_count = 0usize;
        for settlement in settlements.iter().filter(|s| &s.currency == currency) {
            settlement_count += 1;
            *positions.entry(&settlement.from) += settlement.amount;
            *positions.entry(&settlement.to) -= settlement.amount;
        }

        let balances: Vec<NetBalance> = positions
            .into_entries()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(participant, amount)| NetBalance {
                participant,
                currency: currency.clone(),
                amount,
            })
            .collect();

        tracing::debug!(
            "Ledger run for {}: {} expenses, {} settlements, {} open balances",
            currency,
            expense_count,
            settlement_count,
            balances.len()
        );

        balances
    }

    /// Net balances for every currency present, one bucket per currency
    pub fn compute_all_balances(
        &self,
        expenses: &[Expense],
        settlements: &[Settlement],
    ) -> BTreeMap<Currency, Vec<NetBalance>> {
        let currencies: BTreeSet<&Currency> = expenses
            .iter()
            .map(|e| &e.currency)
            .chain(settlements.iter().map(|s| &s.currency))
            .collect();

        currencies
            .into_iter()
            .map(|currency| {
                let balances = self.compute_balances(expenses, settlements, currency);
                (currency.clone(), balances)
            })
            .collect()
    }

    fn apply_expense(&self, positions: &mut Positions, expense: &Expense) {
        for payer in &expense.payers {
            *positions.entry(&payer.participant) += payer.amount_paid;
        }

        let mut settled_total = Decimal::ZERO;
        for share in &expense.split {
            let balance = positions.entry(&share.participant);
            if share.is_settled {
                settled_total += share.owed_amount;
            } else {
                *balance -= share.owed_amount;
            }
        }

        // Pre-settled shares were paid back to the payers directly, so that
        // much of the payers' credit is already discharged.
        if settled_total > Decimal::ZERO && !expense.payers.is_empty() {
            let weights: Vec<Decimal> = expense.payers.iter().map(|p| p.amount_paid).collect();
            // Amounts too large to weigh fall back to the first payer
            let withdrawn = distribute(settled_total, &weights, self.minor_units).unwrap_or_else(|_| {
                let mut first_only = vec![Decimal::ZERO; weights.len()];
                first_only[0] = settled_total;
                first_only
            });
            for (payer, amount) in expense.payers.iter().zip(withdrawn) {
                *positions.entry(&payer.participant) -= amount;
            }
        }
    }
}

/// Running balances keyed by participant, remembering first appearance
#[derive(Default)]
struct Positions {
    index: HashMap<ParticipantId, usize>,
    entries: Vec<(ParticipantId, Decimal)>,
}

impl Positions {
    fn entry(&mut self, participant: &ParticipantId) -> &mut Decimal {
        let idx = match self.index.get(participant) {
            Some(&idx) => idx,
            None => {
                self.entries.push((participant.clone(), Decimal::ZERO));
                self.index.insert(participant.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    fn into_entries(self) -> impl Iterator<Item = (ParticipantId, Decimal)> {
        self.entries.into_iter()
    }
}

/// Net balances for one currency with the default ledger
pub fn compute_balances(
    expenses: &[Expense],
    settlements: &[Settlement],
    currency: &Currency,
) -> Vec<NetBalance> {
    BalanceLedger::default().compute_balances(expenses, settlements, currency)
}

/// Net balances bucketed by currency with the default ledger
pub fn compute_all_balances(
    expenses: &[Expense],
    settlements: &[Settlement],
) -> BTreeMap<Currency, Vec<NetBalance>> {
    BalanceLedger::default().compute_all_balances(expenses, settlements)
}
