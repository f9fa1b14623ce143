//! Player view of the game: what one client should show at its decision point.
//!
//! Everything here is a pure projection of mirrored records. Rendering layers
//! (or the simulation binary) match on [`ClientView`] instead of re-deriving
//! the round state themselves.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::cards::{Card, RiderType, TeamColor};
use crate::domain::ledger::MoveLedger;
use crate::domain::roles::MAX_PLAYERS;
use crate::domain::round::{derive_phase, RoundPhase};
use crate::entities::{Game, Player, Rider};

/// The screen a client is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ClientView {
    /// Fewer than two players seated.
    WaitingForOpponent,
    /// Both seated, no riders yet. Only the host may pick colors.
    TeamSelection { can_select: bool },
    /// The local player still has riders without a confirmed move.
    Selecting { round: u32 },
    /// The local player is done; the opponent is not.
    WaitingForOthers { round: u32 },
    /// Everyone has moved. Only the host may advance.
    RoundSummary { round: u32, can_advance: bool },
}

/// Project the mirrored records onto the view for `local_player_id`.
pub fn client_view(
    game: &Game,
    local_player_id: Uuid,
    players: &[Player],
    riders: &[Rider],
    ledger: &MoveLedger,
) -> ClientView {
    let local_is_host = players
        .iter()
        .any(|p| p.id == local_player_id && p.is_host());

    match derive_phase(game, players, riders, ledger) {
        RoundPhase::Setup if players.len() < MAX_PLAYERS => ClientView::WaitingForOpponent,
        RoundPhase::Setup => ClientView::TeamSelection {
            can_select: local_is_host,
        },
        RoundPhase::AllMoved { round } => ClientView::RoundSummary {
            round,
            can_advance: local_is_host,
        },
        RoundPhase::Selecting { round } => {
            if ledger.has_player_moved(local_player_id, round, riders) {
                ClientView::WaitingForOthers { round }
            } else {
                ClientView::Selecting { round }
            }
        }
    }
}

/// One line of the round summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveLine {
    pub rider_id: Uuid,
    pub color: TeamColor,
    pub rider_type: RiderType,
    pub card: Card,
}

/// The player's moves for `round`, labelled with rider color and type, in
/// rider order. Moves whose rider is not mirrored are skipped.
pub fn move_summary(
    player_id: Uuid,
    round: u32,
    riders: &[Rider],
    ledger: &MoveLedger,
) -> Vec<MoveLine> {
    riders
        .iter()
        .filter(|r| r.player_id == player_id)
        .filter_map(|r| {
            ledger.move_for_rider(r.id, round).map(|m| MoveLine {
                rider_id: r.id,
                color: r.color,
                rider_type: r.rider_type,
                card: m.card,
            })
        })
        .collect()
}

/// What a player sees of one of their riders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiderSummary {
    pub rider_id: Uuid,
    pub label: String,
    pub deck_count: usize,
    pub discard_count: usize,
    pub hand: Vec<Card>,
}

impl From<&Rider> for RiderSummary {
    fn from(rider: &Rider) -> Self {
        Self {
            rider_id: rider.id,
            label: rider.label(),
            deck_count: rider.deck.len(),
            discard_count: rider.discard.len(),
            hand: rider.hand.clone(),
        }
    }
}
