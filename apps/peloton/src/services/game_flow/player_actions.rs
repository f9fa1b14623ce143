use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{GameFlowService, RoundContext};
use crate::domain::deck::{add_fatigue_card, draw, resolve_choice};
use crate::domain::draft::MoveDraft;
use crate::domain::roles::require_rider_owner;
use crate::domain::round::require_selecting;
use crate::entities::{Move, Player, Rider};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::{moves, players, riders};
use crate::services::require_member;
use crate::state::app_state::AppState;
use crate::store::Write;

impl GameFlowService {
    /// Draw a fresh hand for one of the actor's riders.
    ///
    /// Allowed while the rider has no move in the current round and holds no
    /// hand. The new piles are written with an optimistic lock on the rider.
    pub async fn draw_hand(
        &self,
        state: &AppState,
        actor_id: Uuid,
        rider_id: Uuid,
    ) -> Result<Rider, AppError> {
        let store = state.store();
        let (actor, rider) = load_owned_rider(state, actor_id, rider_id).await?;
        let ctx = RoundContext::load(store, rider.game_id).await?;
        require_member(&actor, &ctx.game)?;
        require_selecting(ctx.phase(), ctx.game.current_round)?;
        if moves::exists_for_rider(store, rider.id, ctx.game.current_round).await? {
            return Err(DomainError::validation(
                ValidationKind::DuplicateMove,
                format!(
                    "{} already moved in round {}",
                    rider.label(),
                    ctx.game.current_round
                ),
            )
            .into());
        }

        let outcome = state.with_rng(|rng| draw(&rider.piles(), rng))?;
        if outcome.reshuffled {
            debug!(rider_id = %rider.id, "Discard reshuffled into deck");
        }
        if outcome.fatigue_added > 0 {
            info!(
                rider_id = %rider.id,
                fatigue = outcome.fatigue_added,
                "Deck exhausted, fatigue cards added"
            );
        }

        let updated = riders::update_piles(store, &rider, outcome.piles).await?;
        debug!(rider_id = %updated.id, hand = ?updated.hand, "Hand drawn");
        Ok(updated)
    }

    /// Commit the actor's selections for the current round.
    ///
    /// Every owned rider needs a selection. All move inserts and all rider
    /// pile updates go out in one batch: either the whole set lands or none.
    pub async fn confirm_moves(
        &self,
        state: &AppState,
        actor_id: Uuid,
        draft: &MoveDraft,
    ) -> Result<Vec<Move>, AppError> {
        let store = state.store();
        let actor = players::require(store, actor_id).await?;
        let ctx = RoundContext::load(store, actor.game_id).await?;
        require_member(&actor, &ctx.game)?;
        let round = ctx.game.current_round;

        if draft.round() != round {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!(
                    "Selections were made for round {} but the game is on round {round}",
                    draft.round()
                ),
            )
            .into());
        }
        require_selecting(ctx.phase(), round)?;

        for (rider_id, _) in draft.selections() {
            let rider = ctx.rider(rider_id).ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Rider, format!("Rider {rider_id} not found"))
            })?;
            require_rider_owner(&actor, rider)?;
        }

        let own: Vec<&Rider> = ctx
            .riders
            .iter()
            .filter(|r| r.player_id == actor.id)
            .collect();
        if !draft.is_complete(own.iter().copied()) {
            return Err(DomainError::validation(
                ValidationKind::IncompleteSelection,
                "Choose a card for every rider before confirming",
            )
            .into());
        }

        let mut writes = Vec::with_capacity(own.len() * 2);
        let mut confirmed = Vec::with_capacity(own.len());
        for rider in own {
            ctx.ledger.ensure_unrecorded(rider.id, round)?;
            let Some(index) = draft.selection(rider.id) else {
                continue;
            };
            let (card, piles) = resolve_choice(&rider.piles(), index)?;
            let mv = Move::new(ctx.game.id, actor.id, rider.id, card, round);
            writes.push(Write::insert(mv.clone()));
            writes.push(riders::piles_write(rider, piles));
            confirmed.push(mv);
        }

        if let Err(e) = store.commit(writes).await {
            warn!(
                game_id = %ctx.game.id,
                player_id = %actor.id,
                round,
                error = %e,
                "Move confirmation rejected"
            );
            return Err(e.into());
        }

        info!(
            game_id = %ctx.game.id,
            player_id = %actor.id,
            round,
            moves = confirmed.len(),
            "Moves confirmed"
        );
        Ok(confirmed)
    }

    /// Voluntary penalty: put one fatigue card on the rider's discard.
    pub async fn add_fatigue(
        &self,
        state: &AppState,
        actor_id: Uuid,
        rider_id: Uuid,
    ) -> Result<Rider, AppError> {
        let (_, rider) = load_owned_rider(state, actor_id, rider_id).await?;
        let updated =
            riders::update_piles(state.store(), &rider, add_fatigue_card(&rider.piles())).await?;
        info!(rider_id = %updated.id, discard = updated.discard.len(), "Fatigue card added");
        Ok(updated)
    }
}

async fn load_owned_rider(
    state: &AppState,
    actor_id: Uuid,
    rider_id: Uuid,
) -> Result<(Player, Rider), AppError> {
    let actor = players::require(state.store(), actor_id).await?;
    let rider = riders::require(state.store(), rider_id).await?;
    if let Err(e) = require_rider_owner(&actor, &rider) {
        warn!(player_id = %actor.id, rider_id = %rider.id, "Rider action by non-owner");
        return Err(e.into());
    }
    Ok((actor, rider))
}
