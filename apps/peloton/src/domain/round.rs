//! Round phases and the transitions between them.
//!
//! `Setup -> Selecting(1) -> AllMoved(1) -> Selecting(2) -> ...`
//!
//! The phase is never stored. It is derived from the game record and the
//! move ledger, so every client computes the same answer from the same data.

use serde::{Deserialize, Serialize};

use crate::domain::ledger::MoveLedger;
use crate::domain::roles::{require_host, HostAction};
use crate::entities::{Game, GameState, Player, Rider};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RoundPhase {
    Setup,
    Selecting { round: u32 },
    AllMoved { round: u32 },
}

impl RoundPhase {
    pub fn round(self) -> Option<u32> {
        match self {
            RoundPhase::Setup => None,
            RoundPhase::Selecting { round } | RoundPhase::AllMoved { round } => Some(round),
        }
    }
}

pub fn derive_phase(
    game: &Game,
    players: &[Player],
    riders: &[Rider],
    ledger: &MoveLedger,
) -> RoundPhase {
    match game.state {
        GameState::Setup => RoundPhase::Setup,
        GameState::Active => {
            let round = game.current_round;
            if ledger.all_players_moved(round, players, riders) {
                RoundPhase::AllMoved { round }
            } else {
                RoundPhase::Selecting { round }
            }
        }
    }
}

/// Validate `AllMoved(N) -> Selecting(N+1)` for `actor` and return `N+1`.
pub fn plan_advance(game: &Game, actor: &Player, phase: RoundPhase) -> Result<u32, DomainError> {
    require_host(actor, HostAction::AdvanceRound)?;
    match phase {
        RoundPhase::AllMoved { round } if round == game.current_round => {
            round.checked_add(1).ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::PhaseMismatch,
                    format!("Round {round} is the last round this game can reach"),
                )
            })
        }
        RoundPhase::AllMoved { round } => Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!(
                "Round {round} is resolved but the game is on round {}",
                game.current_round
            ),
        )),
        RoundPhase::Selecting { round } => Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("Not every player has moved in round {round}"),
        )),
        RoundPhase::Setup => Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Teams have not been selected yet",
        )),
    }
}

/// Moves may only be confirmed while the given round is being selected.
pub fn require_selecting(phase: RoundPhase, round: u32) -> Result<(), DomainError> {
    match phase {
        RoundPhase::Selecting { round: current } if current == round => Ok(()),
        RoundPhase::Selecting { round: current } | RoundPhase::AllMoved { round: current } => {
            Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("Moves for round {round} are closed; the game is on round {current}"),
            ))
        }
        RoundPhase::Setup => Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Teams have not been selected yet",
        )),
    }
}
