//! Player roles and the authorization predicates every role-gated action uses.

use serde::{Deserialize, Serialize};

use crate::entities::{Player, Rider};
use crate::errors::domain::{DomainError, ForbiddenKind};

/// Players per game.
pub const MAX_PLAYERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    /// First seat: selects teams and advances rounds.
    Host,
    /// Second seat.
    Guest,
}

impl PlayerRole {
    pub const fn display_name(self) -> &'static str {
        match self {
            PlayerRole::Host => "Player 1",
            PlayerRole::Guest => "Player 2",
        }
    }

    /// First seat not held by anyone in `seated`, host before guest.
    /// `None` once every seat is taken.
    pub fn first_open(seated: &[Player]) -> Option<Self> {
        if seated.len() >= MAX_PLAYERS {
            return None;
        }
        [PlayerRole::Host, PlayerRole::Guest]
            .into_iter()
            .find(|role| seated.iter().all(|p| p.role != *role))
    }
}

/// Actions reserved for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    SelectTeams,
    AdvanceRound,
}

impl HostAction {
    fn describe(self) -> &'static str {
        match self {
            HostAction::SelectTeams => "select teams",
            HostAction::AdvanceRound => "advance the round",
        }
    }
}

/// The single authority check for host-only actions.
pub fn require_host(actor: &Player, action: HostAction) -> Result<(), DomainError> {
    if actor.role == PlayerRole::Host {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            ForbiddenKind::InsufficientRole,
            format!(
                "Only {} can {}",
                PlayerRole::Host.display_name(),
                action.describe()
            ),
        ))
    }
}

pub fn require_rider_owner(actor: &Player, rider: &Rider) -> Result<(), DomainError> {
    if rider.player_id == actor.id {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            ForbiddenKind::NotRiderOwner,
            format!("{} does not belong to {}", rider.label(), actor.display_name()),
        ))
    }
}
