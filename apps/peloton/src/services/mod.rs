//! Services: load records, run domain rules, commit the result.
//!
//! Services are the trust boundary. They reload whatever they validate from
//! the store instead of relying on caller-provided state.

pub mod game_flow;
pub mod lobby;
pub mod roster;

use crate::entities::{Game, Player};
use crate::errors::domain::{DomainError, NotFoundKind};

/// The actor must be seated in `game`.
pub(crate) fn require_member(actor: &Player, game: &Game) -> Result<(), DomainError> {
    if actor.game_id == game.id {
        Ok(())
    } else {
        Err(DomainError::not_found(
            NotFoundKind::Player,
            format!("Player {} is not part of game {}", actor.id, game.id),
        ))
    }
}
