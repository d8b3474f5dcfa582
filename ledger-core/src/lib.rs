//! Tally Ledger Core
//!
//! Split allocation and per-currency balance aggregation for shared expenses.
//!
//! # Architecture
//!
//! - **Allocator**: expense total + participant inputs → owed amounts
//! - **Ledger**: expenses + settlements → net balance per participant
//! - **Settlement log**: append-only record of direct payments
//!
//! Everything here is a pure function of its inputs. Callers hand in a
//! snapshot of expenses and settlements and get freshly computed results.
//!
//! # Invariants
//!
//! - Split sum: computed splits sum to the expense total exactly
//! - Zero-sum: balances in one currency sum to zero
//! - Currency isolation: amounts in different currencies are never combined
//!
//! # Example
//!
//! ```
//! use tally_ledger::{allocate_split, AllocationRequest, Currency, ParticipantInput, SplitMode};
//! use rust_decimal::Decimal;
//!
//! let request = AllocationRequest {
//!     total: Decimal::new(10000, 2),
//!     currency: Currency::new("INR").unwrap(),
//!     participants: vec![
//!         ParticipantInput::new("a"),
//!         ParticipantInput::new("b"),
//!         ParticipantInput::new("c"),
//!     ],
//!     mode: SplitMode::Equal,
//! };
//!
//! let allocation = allocate_split(&request).unwrap();
//! assert_eq!(allocation.shares[0].owed_amount, Decimal::new(3334, 2));
//! assert_eq!(allocation.remaining(), Decimal::ZERO);
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

// Model
pub mod types;
pub mod error;
pub mod config;

// Splitting
pub mod allocator;
pub mod draft;

// Balances
pub mod ledger;
pub mod log;
pub mod directory;

// Re-exports
pub use types::{
    Currency, Expense, NetBalance, Participant, ParticipantId, Payer, Settlement, SplitMode,
    SplitShare,
};
pub use error::{Error, Result};
pub use config::{AllocationConfig, DEFAULT_MINOR_UNITS, DEFAULT_TOLERANCE};
pub use allocator::{allocate_split, Allocation, AllocationRequest, ParticipantInput, SplitAllocator};
pub use draft::SplitDraft;
pub use ledger::{compute_all_balances, compute_balances, BalanceLedger};
pub use log::SettlementLog;
pub use directory::ParticipantDirectory;
