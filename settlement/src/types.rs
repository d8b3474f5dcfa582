//! Core types for settlement suggestions

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_ledger::{Currency, NetBalance, ParticipantDirectory, ParticipantId, Settlement};

/// Payment the netting engine suggests (debtor → creditor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedPayment {
    /// Debtor (pays)
    pub from: ParticipantId,

    /// Creditor (receives)
    pub to: ParticipantId,

    /// Amount to pay
    pub amount: Decimal,

    /// Currency
    pub currency: Currency,
}

impl SuggestedPayment {
    /// Turn the suggestion into a settlement for the full or a partial amount
    pub fn to_settlement(
        &self,
        amount: Option<Decimal>,
        timestamp: DateTime<Utc>,
    ) -> tally_ledger::Result<Settlement> {
        Settlement::record(
            self.from.clone(),
            self.to.clone(),
            amount.unwrap_or(self.amount),
            self.currency.clone(),
            timestamp,
        )
    }
}

/// Suggested payment with display names attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelledPayment {
    /// Debtor ID
    pub from: ParticipantId,

    /// Debtor display name
    pub from_name: String,

    /// Creditor ID
    pub to: ParticipantId,

    /// Creditor display name
    pub to_name: String,

    /// Amount to pay
    pub amount: Decimal,

    /// Currency
    pub currency: Currency,
}

/// Netting result for one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Currency
    pub currency: Currency,

    /// Open balances the plan was computed from
    pub balances: Vec<NetBalance>,

    /// Payments that bring everyone to zero
    pub payments: Vec<SuggestedPayment>,

    /// Sum owed by all debtors
    pub total_outstanding: Decimal,
}

impl SettlementPlan {
    /// Build a plan from balances and the payments netted from them
    pub fn new(currency: Currency, balances: Vec<NetBalance>, payments: Vec<SuggestedPayment>) -> Self {
        let total_outstanding = balances
            .iter()
            .filter(|b| b.is_debtor())
            .map(|b| b.magnitude())
            .sum();

        Self {
            currency,
            balances,
            payments,
            total_outstanding,
        }
    }

    /// Number of payments
    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    /// Nothing left to pay
    pub fn is_settled(&self) -> bool {
        self.payments.is_empty()
    }

    /// Payments with display names resolved
    pub fn labelled(&self, directory: &ParticipantDirectory) -> Vec<LabelledPayment> {
        self.payments
            .iter()
            .map(|p| LabelledPayment {
                from: p.from.clone(),
                from_name: directory.resolve(&p.from).into_owned(),
                to: p.to.clone(),
                to_name: directory.resolve(&p.to).into_owned(),
                amount: p.amount,
                currency: p.currency.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_ledger::Participant;

    fn inr() -> Currency {
        Currency::new("INR").unwrap()
    }

    fn payment(from: &str, to: &str, amount: i64) -> SuggestedPayment {
        SuggestedPayment {
            from: from.into(),
            to: to.into(),
            amount: Decimal::new(amount, 2),
            currency: inr(),
        }
    }

    #[test]
    fn test_to_settlement_full_and_partial() {
        let suggestion = payment("b", "a", 4000);

        let full = suggestion.to_settlement(None, Utc::now()).unwrap();
        assert_eq!(full.amount, Decimal::new(4000, 2));
        assert_eq!(full.from, ParticipantId::new("b"));

        let partial = suggestion
            .to_settlement(Some(Decimal::new(1500, 2)), Utc::now())
            .unwrap();
        assert_eq!(partial.amount, Decimal::new(1500, 2));

        assert!(suggestion.to_settlement(Some(Decimal::ZERO), Utc::now()).is_err());
    }

    #[test]
    fn test_plan_outstanding() {
        let balances = vec![
            NetBalance::new("a", inr(), Decimal::new(6000, 2)),
            NetBalance::new("b", inr(), Decimal::new(-4000, 2)),
            NetBalance::new("c", inr(), Decimal::new(-2000, 2)),
        ];
        let plan = SettlementPlan::new(
            inr(),
            balances,
            vec![payment("b", "a", 4000), payment("c", "a", 2000)],
        );

        assert_eq!(plan.total_outstanding, Decimal::new(6000, 2));
        assert_eq!(plan.payment_count(), 2);
        assert!(!plan.is_settled());
    }

    #[test]
    fn test_labelled_uses_placeholder() {
        let directory: ParticipantDirectory = vec![Participant::new("a", "Asha")].into_iter().collect();
        let plan = SettlementPlan::new(inr(), vec![], vec![payment("b", "a", 4000)]);

        let labelled = plan.labelled(&directory);
        assert_eq!(labelled[0].to_name, "Asha");
        assert_eq!(labelled[0].from_name, "Unknown (b)");
    }
}
