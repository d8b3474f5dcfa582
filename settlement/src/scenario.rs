//! Scenario files
//!
//! A scenario is a JSON snapshot of one group: `participants`, `expenses`
//! and the `settlements` recorded so far. Loading it checks every record
//! the same way the engine checks new ones, then plans each currency.

use crate::{Config, Error, LabelledPayment, Result, SettlementEngine};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tally_ledger::{Currency, Expense, Participant, ParticipantDirectory, Settlement, SettlementLog};

/// Group snapshot as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Known participants (for display names)
    #[serde(default)]
    pub participants: Vec<Participant>,

    /// Expenses in entry order
    pub expenses: Vec<Expense>,

    /// Settlements recorded so far
    #[serde(default)]
    pub settlements: Vec<Settlement>,
}

/// Outstanding payments for one currency, with names attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanReport {
    /// Sum of what debtors owe
    pub total_outstanding: Decimal,

    /// Suggested payments
    pub payments: Vec<LabelledPayment>,
}

impl Scenario {
    /// Load a scenario from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a scenario from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json)?;
        tracing::info!(
            "Loaded {} expenses, {} settlements, {} participants",
            scenario.expenses.len(),
            scenario.settlements.len(),
            scenario.participants.len()
        );
        Ok(scenario)
    }

    /// Validate every record and build an engine holding the settlements
    pub fn into_engine(self, config: Config) -> Result<(SettlementEngine, Vec<Expense>, ParticipantDirectory)> {
        for settlement in &self.settlements {
            settlement.validate().map_err(|source| Error::InvalidRecord {
                id: settlement.settlement_id,
                source,
            })?;
        }

        let engine = SettlementEngine::with_log(config, SettlementLog::from(self.settlements))?;
        for expense in &self.expenses {
            engine.validate_expense(expense).map_err(|err| match err {
                Error::Ledger(source) => Error::InvalidRecord {
                    id: expense.id,
                    source,
                },
                other => other,
            })?;
        }

        let directory = self.participants.into_iter().collect();
        Ok((engine, self.expenses, directory))
    }

    /// Per-currency plan reports
    pub fn report(self, config: Config) -> Result<BTreeMap<Currency, PlanReport>> {
        let (engine, expenses, directory) = self.into_engine(config)?;

        let report = engine
            .plan_all(&expenses)?
            .into_iter()
            .map(|(currency, plan)| {
                let report = PlanReport {
                    total_outstanding: plan.total_outstanding,
                    payments: plan.labelled(&directory),
                };
                (currency, report)
            })
            .collect();

        Ok(report)
    }
}
