use tracing::{info, warn};
use uuid::Uuid;

use super::{GameFlowService, RoundContext};
use crate::domain::round::{plan_advance, RoundPhase};
use crate::entities::Game;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::games;
use crate::state::app_state::AppState;

impl GameFlowService {
    /// `AllMoved(N) -> Selecting(N+1)`, host only.
    ///
    /// The phase is derived from a fresh read and the round write is guarded
    /// by the game version from that read, so two stale advances cannot skip
    /// a round.
    pub async fn advance_round(
        &self,
        state: &AppState,
        actor_id: Uuid,
        game_id: Uuid,
    ) -> Result<Game, AppError> {
        let ctx = RoundContext::load(state.store(), game_id).await?;
        let actor = ctx.player(actor_id).ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Player,
                format!("Player {actor_id} is not part of game {game_id}"),
            )
        })?;

        let next = match plan_advance(&ctx.game, actor, ctx.phase()) {
            Ok(next) => next,
            Err(e) => {
                warn!(
                    game_id = %game_id,
                    player_id = %actor_id,
                    error = %e,
                    "Round advance rejected"
                );
                return Err(e.into());
            }
        };

        let game = games::set_round(state.store(), &ctx.game, next).await?;
        info!(game_id = %game.id, round = game.current_round, "Round advanced");
        Ok(game)
    }

    pub async fn current_phase(
        &self,
        state: &AppState,
        game_id: Uuid,
    ) -> Result<RoundPhase, AppError> {
        Ok(RoundContext::load(state.store(), game_id).await?.phase())
    }
}
