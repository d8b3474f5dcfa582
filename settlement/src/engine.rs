//! Main settlement engine
//!
//! Chains balance ledger → netting per currency and keeps the append-only
//! log of confirmed settlements.
//!
//! The engine holds no pending state. Confirming a suggestion (in full or in
//! part) appends a settlement; the next call recomputes everything from the
//! expenses plus the log.

use crate::{
    config::Config,
    netting::NettingEngine,
    types::{SettlementPlan, SuggestedPayment},
    Error, Result,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tally_ledger::{
    Allocation, AllocationRequest, BalanceLedger, Currency, Expense, NetBalance, ParticipantId,
    Settlement, SettlementLog, SplitAllocator,
};

/// Settlement engine
#[derive(Debug)]
pub struct SettlementEngine {
    /// Split allocator
    allocator: SplitAllocator,

    /// Balance ledger
    ledger: BalanceLedger,

    /// Netting engine
    netting: NettingEngine,

    /// Confirmed settlements
    log: SettlementLog,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create new settlement engine with an empty log
    pub fn new(config: Config) -> Result<Self> {
        Self::with_log(config, SettlementLog::new())
    }

    /// Create engine over previously recorded settlements
    pub fn with_log(config: Config, log: SettlementLog) -> Result<Self> {
        config.validate()?;

        let allocator = SplitAllocator::new(config.allocation.clone());
        let ledger = BalanceLedger::new(config.allocation.minor_units);
        let netting = NettingEngine::new(config.netting.tolerance);

        tracing::info!(
            "Settlement engine ready ({} v{}, {} settlements loaded)",
            config.service_name,
            config.service_version,
            log.len()
        );

        Ok(Self {
            allocator,
            ledger,
            netting,
            log,
            config,
        })
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Allocate a split with the configured allocator
    pub fn allocate(&self, request: &AllocationRequest) -> Result<Allocation> {
        Ok(self.allocator.allocate(request)?)
    }

    /// Check an expense against the configured tolerance before it is used
    pub fn validate_expense(&self, expense: &Expense) -> Result<()> {
        Ok(expense.validate(self.config.allocation.tolerance)?)
    }

    /// Net balances for one currency, including recorded settlements
    pub fn balances(&self, expenses: &[Expense], currency: &Currency) -> Vec<NetBalance> {
        self.ledger
            .compute_balances(expenses, self.log.as_slice(), currency)
    }

    /// Suggested payments for one currency
    pub fn suggest_payments(
        &self,
        expenses: &[Expense],
        currency: &Currency,
    ) -> Result<Vec<SuggestedPayment>> {
        let balances = self.balances(expenses, currency);
        self.netting.compute_settlements(&balances)
    }

    /// Settlement plan for one currency
    pub fn plan(&self, expenses: &[Expense], currency: &Currency) -> Result<SettlementPlan> {
        let balances = self.balances(expenses, currency);
        let payments = self.netting.compute_settlements(&balances)?;
        Ok(SettlementPlan::new(currency.clone(), balances, payments))
    }

    /// Settlement plans for every currency present in expenses or the log
    pub fn plan_all(&self, expenses: &[Expense]) -> Result<BTreeMap<Currency, SettlementPlan>> {
        let buckets = self.ledger.compute_all_balances(expenses, self.log.as_slice());

        let mut plans = BTreeMap::new();
        for (currency, balances) in buckets {
            let payments = self.netting.compute_settlements(&balances)?;
            tracing::info!(
                "{}: {} open balances → {} suggested payments",
                currency,
                balances.len(),
                payments.len()
            );
            plans.insert(currency.clone(), SettlementPlan::new(currency, balances, payments));
        }

        Ok(plans)
    }

    /// Record a direct payment between two participants
    pub fn record_settlement(
        &mut self,
        from: ParticipantId,
        to: ParticipantId,
        amount: Decimal,
        currency: Currency,
        timestamp: DateTime<Utc>,
    ) -> Result<Settlement> {
        let settlement = Settlement::record(from, to, amount, currency, timestamp)?;
        self.log.append(settlement.clone());
        Ok(settlement)
    }

    /// Confirm a suggested payment for its full amount, or `amount` if given
    pub fn confirm(
        &mut self,
        payment: &SuggestedPayment,
        amount: Option<Decimal>,
        timestamp: DateTime<Utc>,
    ) -> Result<Settlement> {
        let settlement = payment.to_settlement(amount, timestamp)?;
        if settlement.amount < payment.amount {
            tracing::debug!(
                "Partial settlement {} of {} from {} to {}",
                settlement.amount,
                payment.amount,
                payment.from,
                payment.to
            );
        } else if settlement.amount > payment.amount {
            tracing::warn!(
                "Settlement {} exceeds suggested {} from {} to {}",
                settlement.amount,
                payment.amount,
                payment.from,
                payment.to
            );
        }
        self.log.append(settlement.clone());
        Ok(settlement)
    }

    /// Recorded settlements
    pub fn settlements(&self) -> &SettlementLog {
        &self.log
    }

    /// Consume the engine, returning the log for persistence
    pub fn into_log(self) -> SettlementLog {
        self.log
    }
}

/// Record a settlement outside an engine
pub fn record_settlement(
    from: ParticipantId,
    to: ParticipantId,
    amount: Decimal,
    currency: Currency,
    timestamp: DateTime<Utc>,
) -> Result<Settlement> {
    Settlement::record(from, to, amount, currency, timestamp).map_err(Error::from)
}
