//! Local, unconfirmed card selections for one player's riders in one round.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::deck::choose_card;
use crate::entities::Rider;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveDraft {
    round: u32,
    selections: BTreeMap<Uuid, usize>,
}

impl MoveDraft {
    pub fn new(round: u32) -> Self {
        Self {
            round,
            selections: BTreeMap::new(),
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Select the card at `index` in the rider's hand, replacing any earlier
    /// selection for that rider.
    pub fn select(&mut self, rider: &Rider, index: usize) -> Result<(), DomainError> {
        choose_card(&rider.hand, index)?;
        self.selections.insert(rider.id, index);
        Ok(())
    }

    pub fn deselect(&mut self, rider_id: Uuid) {
        self.selections.remove(&rider_id);
    }

    pub fn selection(&self, rider_id: Uuid) -> Option<usize> {
        self.selections.get(&rider_id).copied()
    }

    pub fn selections(&self) -> impl Iterator<Item = (Uuid, usize)> + '_ {
        self.selections.iter().map(|(id, idx)| (*id, *idx))
    }

    /// Every rider in `own_riders` has a selection. An empty set never
    /// completes.
    pub fn is_complete<'a>(&self, own_riders: impl IntoIterator<Item = &'a Rider>) -> bool {
        let mut seen_any = false;
        for rider in own_riders {
            if !self.selections.contains_key(&rider.id) {
                return false;
            }
            seen_any = true;
        }
        seen_any
    }
}
