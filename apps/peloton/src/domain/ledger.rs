//! Move ledger: the append-only record of confirmed choices and the
//! "has everyone moved" queries derived from it.
//!
//! The predicates are recomputed from the moves on every call. Nothing is
//! cached, so two mirrors holding the same moves always agree.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::roles::MAX_PLAYERS;
use crate::entities::{Move, Player, Rider};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveLedger {
    moves: Vec<Move>,
}

impl MoveLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored moves, rejecting a second move for any (rider, round).
    pub fn from_moves(moves: impl IntoIterator<Item = Move>) -> Result<Self, DomainError> {
        let mut ledger = Self::new();
        for mv in moves {
            ledger.record(mv)?;
        }
        Ok(ledger)
    }

    /// Append a move. A rider acts at most once per round.
    pub fn record(&mut self, mv: Move) -> Result<(), DomainError> {
        self.ensure_unrecorded(mv.rider_id, mv.round)?;
        self.moves.push(mv);
        Ok(())
    }

    pub fn ensure_unrecorded(&self, rider_id: Uuid, round: u32) -> Result<(), DomainError> {
        if self
            .moves
            .iter()
            .any(|m| m.rider_id == rider_id && m.round == round)
        {
            return Err(DomainError::validation(
                ValidationKind::DuplicateMove,
                format!("A move for this rider is already recorded for round {round}"),
            ));
        }
        Ok(())
    }

    pub fn contains(&self, move_id: Uuid) -> bool {
        self.moves.iter().any(|m| m.id == move_id)
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Drop every move not belonging to `round`.
    pub fn retain_round(&mut self, round: u32) {
        self.moves.retain(|m| m.round == round);
    }

    /// Moves of `round`, grouped by player id.
    pub fn moves_for_round(&self, round: u32) -> BTreeMap<Uuid, Vec<&Move>> {
        let mut grouped: BTreeMap<Uuid, Vec<&Move>> = BTreeMap::new();
        for mv in self.moves.iter().filter(|m| m.round == round) {
            grouped.entry(mv.player_id).or_default().push(mv);
        }
        grouped
    }

    pub fn moves_for_player(&self, player_id: Uuid, round: u32) -> Vec<&Move> {
        self.moves
            .iter()
            .filter(|m| m.player_id == player_id && m.round == round)
            .collect()
    }

    /// The move a rider made in `round`, if any.
    pub fn move_for_rider(&self, rider_id: Uuid, round: u32) -> Option<&Move> {
        self.moves
            .iter()
            .find(|m| m.rider_id == rider_id && m.round == round)
    }

    /// True iff the player's move count for `round` equals the number of
    /// riders they own. A player owning no riders trivially qualifies.
    pub fn has_player_moved(&self, player_id: Uuid, round: u32, riders: &[Rider]) -> bool {
        let owned = riders.iter().filter(|r| r.player_id == player_id).count();
        self.moves_for_player(player_id, round).len() == owned
    }

    /// True iff exactly two players exist and both have moved in `round`.
    pub fn all_players_moved(&self, round: u32, players: &[Player], riders: &[Rider]) -> bool {
        players.len() == MAX_PLAYERS
            && players
                .iter()
                .all(|p| self.has_player_moved(p.id, round, riders))
    }
}
