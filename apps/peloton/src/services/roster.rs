//! One-shot team selection: split colors, create eight riders, start the game.

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::cards::TeamColor;
use crate::domain::roles::{require_host, HostAction, PlayerRole, MAX_PLAYERS};
use crate::domain::roster::{plan_roster, split_colors};
use crate::entities::{GameState, Rider};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::{games, players, riders};
use crate::services::require_member;
use crate::state::app_state::AppState;
use crate::store::Write;

#[derive(Debug, Default, Clone, Copy)]
pub struct RosterService;

impl RosterService {
    pub fn new() -> Self {
        Self
    }

    /// Host picks two colors; the guest gets the other two.
    ///
    /// Rider inserts and the `setup -> active` transition commit as one batch,
    /// so a failure leaves the game in `setup` with no riders.
    pub async fn create_roster(
        &self,
        state: &AppState,
        game_id: Uuid,
        actor_id: Uuid,
        colors: &[TeamColor],
    ) -> Result<Vec<Rider>, AppError> {
        let store = state.store();
        let game = games::require(store, game_id).await?;
        let actor = players::require(store, actor_id).await?;
        require_member(&actor, &game)?;
        if let Err(e) = require_host(&actor, HostAction::SelectTeams) {
            warn!(game_id = %game.id, player_id = %actor.id, "Non-host attempted team selection");
            return Err(e.into());
        }

        let has_riders = !riders::list_for_game(store, game.id).await?.is_empty();
        if game.state != GameState::Setup || has_riders {
            return Err(DomainError::validation(
                ValidationKind::RosterExists,
                "Teams have already been selected for this game",
            )
            .into());
        }

        let seated = players::list_for_game(store, game.id).await?;
        let host = seated.iter().find(|p| p.role == PlayerRole::Host);
        let guest = seated.iter().find(|p| p.role == PlayerRole::Guest);
        let (Some(host), Some(guest), MAX_PLAYERS) = (host, guest, seated.len()) else {
            return Err(DomainError::validation(
                ValidationKind::NotEnoughPlayers,
                "Both players must be seated before selecting teams",
            )
            .into());
        };

        let split = split_colors(colors)?;
        let roster = state.with_rng(|rng| plan_roster(game.id, host, guest, &split, rng));

        let mut writes: Vec<Write> = roster.iter().cloned().map(Write::insert).collect();
        writes.push(games::activate_write(&game));
        if let Err(e) = store.commit(writes).await {
            error!(game_id = %game.id, error = %e, "Roster commit failed; game stays in setup");
            return Err(e.into());
        }

        info!(
            game_id = %game.id,
            host_colors = ?split.host,
            guest_colors = ?split.guest,
            riders = roster.len(),
            "Roster created, game active"
        );
        Ok(roster)
    }
}
