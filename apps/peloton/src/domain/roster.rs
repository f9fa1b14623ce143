//! Team split and rider creation for the one-shot roster setup.

use rand::Rng;
use uuid::Uuid;

use crate::domain::cards::{RiderType, TeamColor};
use crate::domain::deck::CardPiles;
use crate::entities::{Player, Rider};
use crate::errors::domain::{DomainError, ValidationKind};

/// Colors each player controls.
pub const TEAMS_PER_PLAYER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamSplit {
    pub host: [TeamColor; TEAMS_PER_PLAYER],
    pub guest: [TeamColor; TEAMS_PER_PLAYER],
}

/// The host picks exactly two distinct colors; the guest gets the other two
/// in canonical color order.
pub fn split_colors(selected: &[TeamColor]) -> Result<TeamSplit, DomainError> {
    let invalid = || {
        DomainError::validation(
            ValidationKind::InvalidColorSelection,
            format!("You must select exactly {TEAMS_PER_PLAYER} different colors"),
        )
    };

    let [first, second] = selected else {
        return Err(invalid());
    };
    if first == second {
        return Err(invalid());
    }

    let rest: Vec<TeamColor> = TeamColor::ALL
        .into_iter()
        .filter(|c| c != first && c != second)
        .collect();
    let [g1, g2] = rest[..] else {
        return Err(invalid());
    };

    Ok(TeamSplit {
        host: [*first, *second],
        guest: [g1, g2],
    })
}

/// One Sprinter and one Rouleur per color, each with its own shuffled deck.
/// Host riders come first, then guest riders.
pub fn plan_roster<R: Rng + ?Sized>(
    game_id: Uuid,
    host: &Player,
    guest: &Player,
    split: &TeamSplit,
    rng: &mut R,
) -> Vec<Rider> {
    let owners = [(host.id, split.host), (guest.id, split.guest)];
    let mut riders = Vec::with_capacity(TeamColor::ALL.len() * RiderType::ALL.len());
    for (player_id, colors) in owners {
        for color in colors {
            for rider_type in RiderType::ALL {
                let piles = CardPiles::starting(rider_type, rng);
                riders.push(Rider::new(game_id, player_id, rider_type, color, piles));
            }
        }
    }
    riders
}
