//! Tally Settlement Engine
//!
//! Turns shared-expense balances into a short list of "who pays whom".
//!
//! # Architecture
//!
//! For each currency present in the data set:
//!
//! 1. **Ledger**: expenses + recorded settlements → net balance per participant
//! 2. **Netting**: greedy largest-pair matching → suggested payments
//! 3. **Confirmation**: a confirmed (possibly partial) payment is appended to
//!    the settlement log and the next run starts from the new balances
//!
//! Balances in different currencies never meet; netting rejects mixed input.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use rust_decimal::Decimal;
//! use tally_ledger::{Currency, Expense, Payer, SplitShare};
//! use tally_settlement::{Config, SettlementEngine};
//! use uuid::Uuid;
//!
//! # fn main() -> tally_settlement::Result<()> {
//! let inr = Currency::new("INR")?;
//! let expenses = vec![Expense::new(
//!     Uuid::new_v4(),
//!     inr.clone(),
//!     vec![Payer::new("a", Decimal::new(6000, 2))],
//!     vec![
//!         SplitShare::new("b", Decimal::new(4000, 2)),
//!         SplitShare::new("c", Decimal::new(2000, 2)),
//!     ],
//! )?];
//!
//! let mut engine = SettlementEngine::new(Config::default())?;
//! let payments = engine.suggest_payments(&expenses, &inr)?;
//! assert_eq!(payments.len(), 2);
//!
//! // B pays part of what they owe
//! engine.confirm(&payments[0], Some(Decimal::new(1500, 2)), Utc::now())?;
//! let payments = engine.suggest_payments(&expenses, &inr)?;
//! assert_eq!(payments[0].amount, Decimal::new(2500, 2));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod netting;
pub mod error;
pub mod config;
pub mod engine;
pub mod scenario;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, NettingConfig};
pub use engine::{record_settlement, SettlementEngine};
pub use netting::{compute_settlements, NettingEngine};
pub use scenario::{PlanReport, Scenario};
