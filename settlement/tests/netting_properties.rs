//! Property-based tests for netting invariants
//!
//! - Netting correctness: confirming every suggestion leaves only noise
//! - Payment count: at most (participants - 1) payments per currency
//! - Direction: money only flows from debtors to creditors
//! - Partial settlement: paying part of a suggestion shrinks it by that much

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tally_ledger::{
    allocate_split, AllocationRequest, Currency, Expense, ParticipantInput, Payer, SplitMode,
};
use tally_settlement::{Config, SettlementEngine};
use uuid::Uuid;

const PEOPLE: [&str; 5] = ["asha", "bilal", "chen", "dana", "eli"];

/// Strategy for generating valid amounts (positive, two decimal places)
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_00i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating currencies
fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![Just("INR"), Just("USD")].prop_map(|code| Currency::new(code).unwrap())
}

/// Strategy for generating split modes
fn mode_strategy() -> impl Strategy<Value = SplitMode> {
    prop_oneof![
        Just(SplitMode::Equal),
        Just(SplitMode::Percentage),
        Just(SplitMode::Shares),
    ]
}

/// Strategy for generating balanced expenses paid by one or two people
fn expense_strategy() -> impl Strategy<Value = Expense> {
    (
        amount_strategy(),
        currency_strategy(),
        mode_strategy(),
        prop::collection::vec(0u32..10, PEOPLE.len()),
        0usize..PEOPLE.len(),
        prop::option::of(1usize..PEOPLE.len()),
    )
        .prop_map(|(total, currency, mode, weights, payer, co_payer)| {
            let participants = PEOPLE
                .iter()
                .zip(weights)
                .map(|(id, w)| ParticipantInput::with_raw(*id, w.to_string()))
                .collect();
            let allocation = allocate_split(&AllocationRequest {
                total,
                currency: currency.clone(),
                participants,
                mode,
            })
            .unwrap();

            let payers = match co_payer {
                Some(offset) if total > Decimal::ONE => {
                    let half = (total / Decimal::TWO).round_dp(2);
                    vec![
                        Payer::new(PEOPLE[payer], total - half),
                        Payer::new(PEOPLE[(payer + offset) % PEOPLE.len()], half),
                    ]
                }
                _ => vec![Payer::new(PEOPLE[payer], total)],
            };

            Expense::new(Uuid::new_v4(), currency, payers, allocation.shares).unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: Confirming every suggested payment settles everyone down to noise
    #[test]
    fn prop_netting_settles_everyone(expenses in prop::collection::vec(expense_strategy(), 1..12)) {
        let mut engine = SettlementEngine::new(Config::default()).unwrap();
        let tolerance = engine.config().netting.tolerance;

        for (_, plan) in engine.plan_all(&expenses).unwrap() {
            for payment in &plan.payments {
                engine.confirm(payment, None, Utc::now()).unwrap();
            }
        }

        // Only cent-sized leftovers dropped as noise can remain
        let noise = tolerance * Decimal::from(PEOPLE.len());
        for (_, plan) in engine.plan_all(&expenses).unwrap() {
            prop_assert!(plan.payments.iter().all(|p| p.amount <= noise));
            for balance in &plan.balances {
                prop_assert!(balance.magnitude() <= noise);
            }
        }
    }

    /// Property: Payments go from debtors to creditors, never more than n - 1
    #[test]
    fn prop_payments_well_formed(expenses in prop::collection::vec(expense_strategy(), 1..12)) {
        let engine = SettlementEngine::new(Config::default()).unwrap();
        let tolerance = engine.config().netting.tolerance;

        for (currency, plan) in engine.plan_all(&expenses).unwrap() {
            let balances: HashMap<_, _> = plan
                .balances
                .iter()
                .map(|b| (b.participant.clone(), b.amount))
                .collect();

            prop_assert!(plan.payments.len() <= balances.len().saturating_sub(1));
            for payment in &plan.payments {
                prop_assert_eq!(&payment.currency, &currency);
                prop_assert!(payment.amount > tolerance);
                prop_assert!(balances[&payment.from] < Decimal::ZERO);
                prop_assert!(balances[&payment.to] > Decimal::ZERO);
            }

            let paid: Decimal = plan.payments.iter().map(|p| p.amount).sum();
            prop_assert!((plan.total_outstanding - paid).abs() <= tolerance * Decimal::from(balances.len()));
        }
    }

    /// Property: A partial payment reduces the pair's next suggestion by that amount
    #[test]
    fn prop_partial_settlement(
        expenses in prop::collection::vec(expense_strategy(), 1..8),
        fraction in 1u32..100,
    ) {
        let mut engine = SettlementEngine::new(Config::default()).unwrap();
        let currency = expenses[0].currency.clone();

        let before = engine.suggest_payments(&expenses, &currency).unwrap();
        prop_assume!(!before.is_empty());
        let first = before[0].clone();
        let partial = (first.amount * Decimal::from(fraction) / Decimal::ONE_HUNDRED).round_dp(2);
        prop_assume!(partial > Decimal::ZERO);

        engine.confirm(&first, Some(partial), Utc::now()).unwrap();

        let after = engine.balances(&expenses, &currency);
        let lookup = |id: &tally_ledger::ParticipantId| {
            after
                .iter()
                .find(|b| &b.participant == id)
                .map(|b| b.amount)
                .unwrap_or(Decimal::ZERO)
        };
        let before_balances = balance_lookup(&expenses, &currency);
        prop_assert_eq!(lookup(&first.from), before_balances(&first.from) + partial);
        prop_assert_eq!(lookup(&first.to), before_balances(&first.to) - partial);
    }
}

/// Balance lookup computed without any recorded settlements
fn balance_lookup(
    expenses: &[Expense],
    currency: &Currency,
) -> impl Fn(&tally_ledger::ParticipantId) -> Decimal {
    let balances = tally_ledger::compute_balances(expenses, &[], currency);
    move |id: &tally_ledger::ParticipantId| {
        balances
            .iter()
            .find(|b| &b.participant == id)
            .map(|b| b.amount)
            .unwrap_or(Decimal::ZERO)
    }
}
