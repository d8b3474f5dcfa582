//! Participant name resolution
//!
//! Built once per computation from the contacts the caller supplies, so
//! labelling a settlement list is a map lookup rather than a scan over
//! expense splits.

use crate::types::{Participant, ParticipantId};
use std::borrow::Cow;
use std::collections::HashMap;

/// Participant ID → display name map
#[derive(Debug, Clone, Default)]
pub struct ParticipantDirectory {
    names: HashMap<ParticipantId, String>,
}

impl ParticipantDirectory {
    /// Create empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a participant's display name
    pub fn insert(&mut self, participant: Participant) {
        self.names.insert(participant.id, participant.display_name);
    }

    /// Display name, or a placeholder for IDs the contacts layer doesn't know
    pub fn resolve(&self, id: &ParticipantId) -> Cow<'_, str> {
        match self.names.get(id) {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Owned(format!("Unknown ({})", id)),
        }
    }

    /// Check if the ID is known
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.names.contains_key(id)
    }

    /// Number of known participants
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<Participant> for ParticipantDirectory {
    fn from_iter<I: IntoIterator<Item = Participant>>(iter: I) -> Self {
        let mut directory = Self::new();
        for participant in iter {
            directory.insert(participant);
        }
        directory
    }
}
