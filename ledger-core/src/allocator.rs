//! Split allocation
//!
//! Turns an expense total plus per-participant raw inputs into owed amounts.
//!
//! # Modes
//!
//! - **Equal**: `total / n` each
//! - **Percentage**: weighted by percentage strings, normalised by their sum
//! - **Shares**: weighted by share units (default 1)
//! - **Manual**: amounts entered directly, only validated
//!
//! Computed modes round each amount down to the minor currency unit and add
//! the leftover units to the first participant, so the shares always sum to
//! the total exactly:
//!
//! ```text
//! total 100.00, 3 participants
//!   100.00 / 3 = 33.333.. -> 33.33 each, leftover 0.01
//!   result: 33.34, 33.33, 33.33
//! ```

use crate::{
    config::AllocationConfig,
    types::{Currency, ParticipantId, SplitMode, SplitShare},
    Error, Result,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// One participant's raw input, as typed into the split form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInput {
    /// Participant ID
    pub participant: ParticipantId,

    /// Percentage, share units or manual amount depending on mode
    #[serde(default)]
    pub raw: Option<String>,
}

impl ParticipantInput {
    /// Participant with no input (mode default applies)
    pub fn new(participant: impl Into<ParticipantId>) -> Self {
        Self {
            participant: participant.into(),
            raw: None,
        }
    }

    /// Participant with a raw input value
    pub fn with_raw(participant: impl Into<ParticipantId>, raw: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            raw: Some(raw.into()),
        }
    }

    /// Raw input, treating blank strings as unset
    fn raw_value(&self) -> Option<&str> {
        self.raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Allocation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Expense total (> 0)
    pub total: Decimal,

    /// Currency
    pub currency: Currency,

    /// Participants in list order
    pub participants: Vec<ParticipantInput>,

    /// Allocation mode
    pub mode: SplitMode,
}

/// Allocation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Expense total
    pub total: Decimal,

    /// Currency
    pub currency: Currency,

    /// Mode used
    pub mode: SplitMode,

    /// Shares in participant order
    pub shares: Vec<SplitShare>,
}

impl Allocation {
    /// Sum of owed amounts
    pub fn allocated(&self) -> Decimal {
        self.shares.iter().map(|s| s.owed_amount).sum()
    }

    /// Total minus allocated (what the split form shows as "Remaining")
    pub fn remaining(&self) -> Decimal {
        self.total - self.allocated()
    }

    /// Owed amount for one participant
    pub fn owed_by(&self, participant: &ParticipantId) -> Option<Decimal> {
        self.shares
            .iter()
            .find(|s| &s.participant == participant)
            .map(|s| s.owed_amount)
    }
}

/// Split allocator
#[derive(Debug, Clone, Default)]
pub struct SplitAllocator {
    config: AllocationConfig,
}

impl SplitAllocator {
    /// Create new allocator
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Allocator configuration
    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Allocate a split
    pub fn allocate(&self, request: &AllocationRequest) -> Result<Allocation> {
        if request.total <= Decimal::ZERO {
            return Err(Error::InvalidAmount(request.total));
        }

        let mut seen = HashSet::new();
        for input in &request.participants {
            if !seen.insert(&input.participant) {
                return Err(Error::DuplicateParticipant(input.participant.clone()));
            }
        }

        if request.participants.is_empty() && request.mode != SplitMode::Manual {
            return Err(Error::NoParticipants);
        }

        let mut shares = match request.mode {
            SplitMode::Equal => self.allocate_equal(request)?,
            SplitMode::Percentage => self.allocate_percentage(request)?,
            SplitMode::Shares => self.allocate_shares(request)?,
            SplitMode::Manual => self.allocate_manual(request)?,
        };

        if let Some(self_id) = &self.config.self_id {
            for share in shares.iter_mut().filter(|s| &s.participant == self_id) {
                share.is_settled = true;
            }
        }

        tracing::debug!(
            "Allocated {} {} across {} participants ({:?})",
            request.total,
            request.currency,
            shares.len(),
            request.mode
        );

        Ok(Allocation {
            total: request.total,
            currency: request.currency.clone(),
            mode: request.mode,
            shares,
        })
    }

    fn allocate_equal(&self, request: &AllocationRequest) -> Result<Vec<SplitShare>> {
        let weights = vec![Decimal::ONE; request.participants.len()];
        let shares = self
            .distribute(request, &weights)?
            .into_iter()
            .zip(&request.participants)
            .map(|(owed, input)| SplitShare::new(input.participant.clone(), owed))
            .collect();

        Ok(shares)
    }

    fn allocate_percentage(&self, request: &AllocationRequest) -> Result<Vec<SplitShare>> {
        // Kept short so equal defaults stay exact multiples of each other
        let n = Decimal::from(request.participants.len());
        let default_percentage = (Decimal::ONE_HUNDRED / n).round_dp(10);

        let percentages = request
            .participants
            .iter()
            .map(|input| match input.raw_value() {
                Some(raw) => parse_non_negative(input, raw),
                None => Ok(default_percentage),
            })
            .collect::<Result<Vec<_>>>()?;

        let weights = if percentages.iter().all(|p| p.is_zero()) {
            tracing::debug!("All percentages zero, falling back to equal split");
            vec![Decimal::ONE; percentages.len()]
        } else {
            percentages.clone()
        };

        let shares = self
            .distribute(request, &weights)?
            .into_iter()
            .zip(&request.participants)
            .zip(percentages)
            .map(|((owed, input), percentage)| {
                let mut share = SplitShare::new(input.participant.clone(), owed);
                share.percentage = Some(match input.raw_value() {
                    Some(raw) => raw.to_string(),
                    None => percentage.round_dp(2).normalize().to_string(),
                });
                share
            })
            .collect();

        Ok(shares)
    }

    fn allocate_shares(&self, request: &AllocationRequest) -> Result<Vec<SplitShare>> {
        let units = request
            .participants
            .iter()
            .map(|input| match input.raw_value() {
                Some(raw) => parse_non_negative(input, raw),
                None => Ok(Decimal::ONE),
            })
            .collect::<Result<Vec<_>>>()?;

        let weights = if units.iter().all(|u| u.is_zero()) {
            tracing::debug!("All share units zero, falling back to equal weights");
            vec![Decimal::ONE; units.len()]
        } else {
            units.clone()
        };

        let shares = self
            .distribute(request, &weights)?
            .into_iter()
            .zip(&request.participants)
            .zip(units)
            .map(|((owed, input), units)| {
                let mut share = SplitShare::new(input.participant.clone(), owed);
                share.share_units = Some(units);
                share
            })
            .collect();

        Ok(shares)
    }

    fn allocate_manual(&self, request: &AllocationRequest) -> Result<Vec<SplitShare>> {
        let shares = request
            .participants
            .iter()
            .map(|input| {
                let owed = match input.raw_value() {
                    Some(raw) => parse_non_negative(input, raw)?,
                    None => Decimal::ZERO,
                };
                Ok(SplitShare::new(input.participant.clone(), owed))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut allocated = Decimal::ZERO;
        for (share, input) in shares.iter().zip(&request.participants) {
            allocated = allocated
                .checked_add(share.owed_amount)
                .ok_or_else(|| overflow(input, share.owed_amount))?;
        }
        let remaining = request.total - allocated;
        if remaining.abs() > self.config.tolerance {
            return Err(Error::UnbalancedSplit { remaining });
        }

        Ok(shares)
    }

    /// Split the request total proportionally to `weights` (one per
    /// participant), mapping arithmetic overflow to `InvalidInput` for the
    /// participant whose weight caused it.
    fn distribute(&self, request: &AllocationRequest, weights: &[Decimal]) -> Result<Vec<Decimal>> {
        distribute(request.total, weights, self.config.minor_units).map_err(|index| {
            let input = &request.participants[index];
            overflow(input, weights[index])
        })
    }
}

/// Proportional split of `total`, rounding down to the minor unit, with the
/// leftover units on the first entry.
///
/// Returns the index of the first weight that overflows decimal arithmetic.
pub(crate) fn distribute(
    total: Decimal,
    weights: &[Decimal],
    minor_units: u32,
) -> std::result::Result<Vec<Decimal>, usize> {
    let mut weight_sum = Decimal::ZERO;
    for (index, weight) in weights.iter().enumerate() {
        weight_sum = weight_sum.checked_add(*weight).ok_or(index)?;
    }
    if weights.is_empty() || weight_sum <= Decimal::ZERO {
        return Ok(vec![Decimal::ZERO; weights.len()]);
    }

    let mut amounts = weights
        .iter()
        .enumerate()
        .map(|(index, weight)| {
            total
                .checked_mul(*weight)
                .and_then(|scaled| scaled.checked_div(weight_sum))
                .map(|amount| amount.round_dp_with_strategy(minor_units, RoundingStrategy::ToZero))
                .ok_or(index)
        })
        .collect::<std::result::Result<Vec<_>, usize>>()?;

    // Each amount is at most its proportion of total, so this cannot overflow
    let allocated: Decimal = amounts.iter().sum();
    amounts[0] += total - allocated;
    Ok(amounts)
}

fn parse_non_negative(input: &ParticipantInput, raw: &str) -> Result<Decimal> {
    match Decimal::from_str(raw) {
        Ok(value) if value >= Decimal::ZERO => Ok(value),
        _ => Err(Error::InvalidInput {
            participant: input.participant.clone(),
            value: raw.to_string(),
        }),
    }
}

fn overflow(input: &ParticipantInput, value: Decimal) -> Error {
    Error::InvalidInput {
        participant: input.participant.clone(),
        value: input.raw_value().map_or_else(|| value.to_string(), str::to_string),
    }
}

/// Allocate a split with the default configuration
pub fn allocate_split(request: &AllocationRequest) -> Result<Allocation> {
    SplitAllocator::default().allocate(request)
}
