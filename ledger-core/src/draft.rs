//! Editable split state
//!
//! Holds what the expense form is currently showing and re-runs the
//! allocator on demand. Nothing here is persisted; once the user saves, the
//! resulting [`Allocation`] becomes the expense's split.

use crate::{
    allocator::{Allocation, AllocationRequest, ParticipantInput, SplitAllocator},
    types::{Currency, ParticipantId, SplitMode},
    Result,
};
use rust_decimal::Decimal;

/// Split being edited
#[derive(Debug, Clone)]
pub struct SplitDraft {
    allocator: SplitAllocator,
    request: AllocationRequest,
}

impl SplitDraft {
    /// Start a draft with no participants
    pub fn new(allocator: SplitAllocator, total: Decimal, currency: Currency, mode: SplitMode) -> Self {
        Self {
            allocator,
            request: AllocationRequest {
                total,
                currency,
                participants: Vec::new(),
                mode,
            },
        }
    }

    /// Current request
    pub fn request(&self) -> &AllocationRequest {
        &self.request
    }

    /// Participant IDs in list order
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.request.participants.iter().map(|p| &p.participant)
    }

    /// Add a participant at the end of the list. Returns false if already present.
    pub fn add_participant(&mut self, participant: impl Into<ParticipantId>) -> bool {
        let participant = participant.into();
        if self.position(&participant).is_some() {
            return false;
        }
        self.request.participants.push(ParticipantInput::new(participant));
        true
    }

    /// Drop a participant and their input. Returns false if not present.
    pub fn remove_participant(&mut self, participant: &ParticipantId) -> bool {
        match self.position(participant) {
            Some(idx) => {
                self.request.participants.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Set a participant's raw input. Returns false if not present.
    pub fn set_input(&mut self, participant: &ParticipantId, raw: impl Into<String>) -> bool {
        match self.position(participant) {
            Some(idx) => {
                self.request.participants[idx].raw = Some(raw.into());
                true
            }
            None => false,
        }
    }

    /// Switch mode. Raw inputs mean different things per mode, so they are cleared.
    pub fn set_mode(&mut self, mode: SplitMode) {
        if self.request.mode != mode {
            self.request.mode = mode;
            for input in &mut self.request.participants {
                input.raw = None;
            }
        }
    }

    /// Change the expense total
    pub fn set_total(&mut self, total: Decimal) {
        self.request.total = total;
    }

    /// Run the allocator against the current state
    pub fn allocate(&self) -> Result<Allocation> {
        self.allocator.allocate(&self.request)
    }

    fn position(&self, participant: &ParticipantId) -> Option<usize> {
        self.request
            .participants
            .iter()
            .position(|p| &p.participant == participant)
    }
}
