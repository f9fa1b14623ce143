//! Game flow service - bridges the pure round rules with store persistence.

mod player_actions;
mod round_lifecycle;

use uuid::Uuid;

use crate::domain::ledger::MoveLedger;
use crate::domain::round::{derive_phase, RoundPhase};
use crate::entities::{Game, Player, Rider};
use crate::errors::domain::DomainError;
use crate::repos::{games, moves, players, riders};
use crate::store::RecordStore;

#[derive(Debug, Default, Clone, Copy)]
pub struct GameFlowService;

impl GameFlowService {
    pub fn new() -> Self {
        Self
    }
}

/// Fresh read of everything the round rules look at.
pub(crate) struct RoundContext {
    pub game: Game,
    pub players: Vec<Player>,
    pub riders: Vec<Rider>,
    pub ledger: MoveLedger,
}

impl RoundContext {
    pub async fn load<S: RecordStore + ?Sized>(
        store: &S,
        game_id: Uuid,
    ) -> Result<Self, DomainError> {
        let game = games::require(store, game_id).await?;
        let players = players::list_for_game(store, game.id).await?;
        let riders = riders::list_for_game(store, game.id).await?;
        let round_moves = moves::list_for_round(store, game.id, game.current_round).await?;
        let ledger = MoveLedger::from_moves(round_moves)?;
        Ok(Self {
            game,
            players,
            riders,
            ledger,
        })
    }

    pub fn phase(&self) -> RoundPhase {
        derive_phase(&self.game, &self.players, &self.riders, &self.ledger)
    }

    pub fn player(&self, player_id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn rider(&self, rider_id: Uuid) -> Option<&Rider> {
        self.riders.iter().find(|r| r.id == rider_id)
    }
}
