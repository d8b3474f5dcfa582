//! Debt netting
//!
//! Reduces per-participant net balances to a short list of direct payments.
//!
//! # Algorithm
//!
//! 1. Split balances into creditors (> tolerance) and debtors (< -tolerance)
//! 2. Sort both by magnitude, largest first (stable: ties keep input order)
//! 3. Match the current largest debtor with the current largest creditor,
//!    pay `min(debtor, creditor)`, move past whoever drops below tolerance
//! 4. Stop when either side runs out; leftovers under tolerance are noise
//!
//! Greedy matching is not always the fewest possible transfers (that is a
//! subset-partition problem), but the output is deterministic.
//!
//! # Example
//!
//! ```text
//! Net balances:
//!   A: +60.00
//!   B: -40.00
//!   C: -20.00
//!
//! Payments:
//!   B pays A: 40.00
//!   C pays A: 20.00
//! ```

use crate::{types::SuggestedPayment, Error, Result};
use rust_decimal::Decimal;
use tally_ledger::{NetBalance, ParticipantId, DEFAULT_TOLERANCE};

/// Netting engine
#[derive(Debug, Clone)]
pub struct NettingEngine {
    /// Residual below which a position counts as settled
    tolerance: Decimal,
}

impl Default for NettingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

/// Remaining amount for one side of the matching
struct Position<'a> {
    participant: &'a ParticipantId,
    remaining: Decimal,
}

impl NettingEngine {
    /// Create new netting engine
    pub fn new(tolerance: Decimal) -> Self {
        Self { tolerance }
    }

    /// Compute suggested payments for balances in a single currency
    pub fn compute_settlements(&self, balances: &[NetBalance]) -> Result<Vec<SuggestedPayment>> {
        let currency = match balances.first() {
            Some(first) => &first.currency,
            None => return Ok(Vec::new()),
        };

        if let Some(other) = balances.iter().find(|b| &b.currency != currency) {
            return Err(Error::MixedCurrency {
                expected: currency.clone(),
                found: other.currency.clone(),
            });
        }

        let mut creditors: Vec<Position<'_>> = balances
            .iter()
            .filter(|b| b.amount > self.tolerance)
            .map(|b| Position {
                participant: &b.participant,
                remaining: b.amount,
            })
            .collect();

        let mut debtors: Vec<Position<'_>> = balances
            .iter()
            .filter(|b| b.amount < -self.tolerance)
            .map(|b| Position {
                participant: &b.participant,
                remaining: -b.amount,
            })
            .collect();

        // Largest first; sort_by is stable so equal magnitudes keep input order
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut payments = Vec::new();
        let (mut d, mut c) = (0, 0);

        while d < debtors.len() && c < creditors.len() {
            let amount = debtors[d].remaining.min(creditors[c].remaining);

            if amount > self.tolerance {
                payments.push(SuggestedPayment {
                    from: debtors[d].participant.clone(),
                    to: creditors[c].participant.clone(),
                    amount,
                    currency: currency.clone(),
                });
            }

            debtors[d].remaining -= amount;
            creditors[c].remaining -= amount;

            if self.is_settled(debtors[d].remaining) {
                d += 1;
            }
            if self.is_settled(creditors[c].remaining) {
                c += 1;
            }
        }

        tracing::debug!(
            "Netting for {}: {} creditors, {} debtors → {} payments",
            currency,
            creditors.len(),
            debtors.len(),
            payments.len()
        );

        Ok(payments)
    }

    fn is_settled(&self, remaining: Decimal) -> bool {
        remaining.is_zero() || remaining < self.tolerance
    }
}

/// Compute suggested payments with the default tolerance
pub fn compute_settlements(balances: &[NetBalance]) -> Result<Vec<SuggestedPayment>> {
    NettingEngine::default().compute_settlements(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_ledger::Currency;

    fn currency(code: &str) -> Currency {
        Currency::new(code).unwrap()
    }

    fn balances(entries: &[(&str, i64)]) -> Vec<NetBalance> {
        entries
            .iter()
            .map(|(id, amount)| NetBalance::new(*id, currency("INR"), Decimal::new(*amount, 2)))
            .collect()
    }

    fn pairs(payments: &[SuggestedPayment]) -> Vec<(&str, &str, Decimal)> {
        payments
            .iter()
            .map(|p| (p.from.as_str(), p.to.as_str(), p.amount))
            .collect()
    }

    #[test]
    fn test_simple_netting() {
        let payments = compute_settlements(&balances(&[("a", 6000), ("b", -4000), ("c", -2000)])).unwrap();

        assert_eq!(
            pairs(&payments),
            vec![
                ("b", "a", Decimal::new(4000, 2)),
                ("c", "a", Decimal::new(2000, 2)),
            ]
        );
        assert!(payments.iter().all(|p| p.currency == currency("INR")));
    }

    #[test]
    fn test_largest_pairs_first() {
        // Debtors: d 70, e 30; creditors: b 50, a 30, c 20
        let payments = compute_settlements(&balances(&[
            ("a", 3000),
            ("b", 5000),
            ("c", 2000),
            ("d", -7000),
            ("e", -3000),
        ]))
        .unwrap();

        assert_eq!(
            pairs(&payments),
            vec![
                ("d", "b", Decimal::new(5000, 2)),
                ("d", "a", Decimal::new(2000, 2)),
                ("e", "a", Decimal::new(1000, 2)),
                ("e", "c", Decimal::new(2000, 2)),
            ]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let payments = compute_settlements(&balances(&[
            ("x", -1000),
            ("a", 1000),
            ("y", -1000),
            ("b", 1000),
        ]))
        .unwrap();

        assert_eq!(
            pairs(&payments),
            vec![
                ("x", "a", Decimal::new(1000, 2)),
                ("y", "b", Decimal::new(1000, 2)),
            ]
        );
    }

    #[test]
    fn test_ignores_rounding_noise() {
        let payments = compute_settlements(&balances(&[("a", 1), ("b", -1)])).unwrap();
        assert!(payments.is_empty());

        // 0.005 stays behind after the real payment
        let noisy = vec![
            NetBalance::new("a", currency("INR"), Decimal::new(10005, 3)),
            NetBalance::new("b", currency("INR"), Decimal::new(-10000, 3)),
            NetBalance::new("c", currency("INR"), Decimal::new(-5, 3)),
        ];
        let payments = compute_settlements(&noisy).unwrap();
        assert_eq!(pairs(&payments), vec![("b", "a", Decimal::new(1000, 2))]);
    }

    #[test]
    fn test_empty_balances() {
        assert!(compute_settlements(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_mixed_currency_rejected() {
        let mixed = vec![
            NetBalance::new("a", currency("INR"), Decimal::new(1000, 2)),
            NetBalance::new("b", currency("USD"), Decimal::new(-1000, 2)),
        ];

        match compute_settlements(&mixed) {
            Err(Error::MixedCurrency { expected, found }) => {
                assert_eq!(expected, currency("INR"));
                assert_eq!(found, currency("USD"));
            }
            other => panic!("expected MixedCurrency, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_tolerance_terminates() {
        let engine = NettingEngine::new(Decimal::ZERO);
        let payments = engine
            .compute_settlements(&balances(&[("a", 1), ("b", -1)]))
            .unwrap();
        assert_eq!(pairs(&payments), vec![("b", "a", Decimal::new(1, 2))]);
    }
}
