//! Game creation, joining and leaving.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::roles::PlayerRole;
use crate::entities::{Game, GameState, Player};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::{games, players};
use crate::state::app_state::AppState;
use crate::utils::join_code::{generate_join_code, is_valid_join_code, normalize_join_code};

/// A seated player together with the game they sit in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub game: Game,
    pub player: Player,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LobbyService;

impl LobbyService {
    pub fn new() -> Self {
        Self
    }

    /// Create a game in `setup` with a fresh join code and seat its host.
    ///
    /// Join-code collisions are retried up to `join_code_attempts` times.
    pub async fn create_game(&self, state: &AppState) -> Result<Seat, AppError> {
        let attempts = state.config().join_code_attempts;
        for attempt in 1..=attempts {
            let code = state.with_rng(|rng| generate_join_code(rng));
            let game = Game::new(code);
            let host = Player::new(game.id, PlayerRole::Host);

            match games::create_with_host(state.store(), game, host).await {
                Ok((game, player)) => {
                    info!(
                        game_id = %game.id,
                        player_id = %player.id,
                        join_code = %game.join_code,
                        "Game created"
                    );
                    return Ok(Seat { game, player });
                }
                Err(DomainError::Conflict(ConflictKind::JoinCodeConflict, _)) => {
                    warn!(attempt, attempts, "Join code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(DomainError::conflict(
            ConflictKind::JoinCodeConflict,
            format!("Could not allocate a unique join code after {attempts} attempts"),
        )
        .into())
    }

    /// Join by code. The raw input is trimmed and uppercased, then checked
    /// against the join-code format before any lookup.
    pub async fn join_game(&self, state: &AppState, raw_code: &str) -> Result<Seat, AppError> {
        let code = normalize_join_code(raw_code);
        if !is_valid_join_code(&code) {
            return Err(DomainError::validation(
                ValidationKind::InvalidJoinCode,
                "Join codes are 6 characters from A-Z and 2-9, without 0, O, I or 1",
            )
            .into());
        }

        let game = games::find_by_join_code(state.store(), &code)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Game, format!("No game with code {code}"))
            })?;

        let seated = players::list_for_game(state.store(), game.id).await?;
        let role = PlayerRole::first_open(&seated).ok_or_else(|| {
            DomainError::conflict(ConflictKind::GameFull, "Game already has two players")
        })?;
        debug!(game_id = %game.id, ?role, "Seating player");

        // A concurrent joiner taking the same seat surfaces as GameFull via the
        // (game, role) unique constraint.
        let player = players::create(state.store(), Player::new(game.id, role)).await?;
        info!(game_id = %game.id, player_id = %player.id, ?role, "Player joined");
        Ok(Seat { game, player })
    }

    /// Give up a seat before teams are selected.
    pub async fn leave_game(&self, state: &AppState, player_id: Uuid) -> Result<(), AppError> {
        let player = players::require(state.store(), player_id).await?;
        let game = games::require(state.store(), player.game_id).await?;
        if game.state != GameState::Setup {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Players cannot leave once teams are selected",
            )
            .into());
        }
        players::remove(state.store(), player.id).await?;
        info!(game_id = %game.id, player_id = %player.id, "Player left");
        Ok(())
    }
}
