//! One connected client: a mirror of its game kept current by store
//! notifications, plus the actions the client can take.

use std::sync::Arc;

use futures::future::select_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::identity::{IdentityStore, PersistedIdentity};
use super::mirror::{Applied, Mirror, MirrorEvent, Snapshot};
use crate::domain::cards::TeamColor;
use crate::domain::draft::MoveDraft;
use crate::domain::player_view::ClientView;
use crate::domain::round::RoundPhase;
use crate::entities::{Game, Move, Player, Rider};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::repos::{games, moves, players, riders};
use crate::services::game_flow::GameFlowService;
use crate::services::lobby::{LobbyService, Seat};
use crate::services::roster::RosterService;
use crate::state::app_state::AppState;
use crate::store::{
    ChangeEvent, ChangeKind, EventMask, Filter, RecordStore, Subscription, Table,
};

/// Read the game and everything the mirror holds for its current round.
pub async fn load_snapshot<S: RecordStore + ?Sized>(
    store: &S,
    game_id: Uuid,
) -> Result<Snapshot, DomainError> {
    let game = games::require(store, game_id).await?;
    let players = players::list_for_game(store, game.id).await?;
    let riders = riders::list_for_game(store, game.id).await?;
    let moves = moves::list_for_round(store, game.id, game.current_round).await?;
    Ok(Snapshot {
        game,
        players,
        riders,
        moves,
    })
}

pub struct Session {
    state: AppState,
    identity: Arc<dyn IdentityStore>,
    game_id: Uuid,
    player_id: Uuid,
    mirror: Mirror,
    subscriptions: Vec<Subscription>,
    subscribed_round: Option<u32>,
}

impl Session {
    /// Create a new game and take the host seat.
    pub async fn create(
        state: AppState,
        identity: Arc<dyn IdentityStore>,
    ) -> Result<Self, AppError> {
        let seat = LobbyService::new().create_game(&state).await?;
        Self::seated(state, identity, seat).await
    }

    /// Join an existing game by its code.
    pub async fn join(
        state: AppState,
        identity: Arc<dyn IdentityStore>,
        raw_code: &str,
    ) -> Result<Self, AppError> {
        let seat = LobbyService::new().join_game(&state, raw_code).await?;
        Self::seated(state, identity, seat).await
    }

    /// Resume from persisted identifiers.
    ///
    /// `Ok(None)` when nothing is persisted or the game or player no longer
    /// exists; stale identifiers are cleared so the caller can fall back to
    /// join/create.
    pub async fn resume(
        state: AppState,
        identity: Arc<dyn IdentityStore>,
    ) -> Result<Option<Self>, AppError> {
        let Some(saved) = identity.load()? else {
            return Ok(None);
        };

        let store = state.store();
        let game = games::find_by_id(store, saved.game_id).await?;
        let player = players::find_by_id(store, saved.player_id).await?;
        let (Some(game), Some(player)) = (game, player) else {
            warn!(
                game_id = %saved.game_id,
                player_id = %saved.player_id,
                "Persisted identity is stale, clearing"
            );
            identity.clear()?;
            return Ok(None);
        };
        if player.game_id != game.id {
            warn!(
                game_id = %game.id,
                player_id = %player.id,
                "Persisted player belongs to another game, clearing"
            );
            identity.clear()?;
            return Ok(None);
        }

        players::touch_last_seen(store, player.id).await?;
        info!(game_id = %game.id, player_id = %player.id, "Session resumed");
        let mut session = Self::new(state, identity, game.id, player.id);
        session.realign(game.current_round).await?;
        Ok(Some(session))
    }

    async fn seated(
        state: AppState,
        identity: Arc<dyn IdentityStore>,
        seat: Seat,
    ) -> Result<Self, AppError> {
        identity.save(&PersistedIdentity {
            game_id: seat.game.id,
            player_id: seat.player.id,
        })?;
        let mut session = Self::new(state, identity, seat.game.id, seat.player.id);
        session.realign(seat.game.current_round).await?;
        Ok(session)
    }

    fn new(
        state: AppState,
        identity: Arc<dyn IdentityStore>,
        game_id: Uuid,
        player_id: Uuid,
    ) -> Self {
        Self {
            state,
            identity,
            game_id,
            player_id,
            mirror: Mirror::new(),
            subscriptions: Vec::new(),
            subscribed_round: None,
        }
    }

    /// (Re)subscribe for `round`, then load a snapshot. Subscribing first
    /// means nothing committed after the snapshot read is missed; anything
    /// delivered twice is dropped by the mirror. Repeats until the snapshot
    /// round matches the subscribed round.
    async fn realign(&mut self, mut round: u32) -> Result<(), AppError> {
        loop {
            self.subscribe_all(round);
            let snapshot = load_snapshot(self.state.store(), self.game_id).await?;
            let loaded = snapshot.game.current_round;
            self.mirror.apply(MirrorEvent::SnapshotLoaded(snapshot));
            if loaded == round {
                return Ok(());
            }
            debug!(
                game_id = %self.game_id,
                from = round,
                to = loaded,
                "Round moved during snapshot"
            );
            round = loaded;
        }
    }

    fn subscribe_all(&mut self, round: u32) {
        // Dropping the old feeds releases them.
        self.subscriptions.clear();
        let store = self.state.store();
        let game_id = self.game_id;
        self.subscriptions = vec![
            store.subscribe(
                Table::Games,
                EventMask::only(ChangeKind::Update),
                Filter::Id(game_id),
            ),
            store.subscribe(Table::Players, EventMask::ALL, Filter::GameId(game_id)),
            store.subscribe(
                Table::Riders,
                EventMask::only(ChangeKind::Insert).with(ChangeKind::Update),
                Filter::GameId(game_id),
            ),
            store.subscribe(
                Table::Moves,
                EventMask::only(ChangeKind::Insert),
                Filter::GameRound { game_id, round },
            ),
        ];
        self.subscribed_round = Some(round);
        debug!(game_id = %game_id, round, "Subscriptions established");
    }

    fn apply(&mut self, event: ChangeEvent) -> Option<u32> {
        match self.mirror.apply(MirrorEvent::from(event)) {
            Applied::RoundChanged { to, .. } => Some(to),
            Applied::Changed | Applied::Ignored => None,
        }
    }

    /// Apply every notification already delivered. Returns how many events
    /// were drained.
    pub async fn sync(&mut self) -> Result<usize, AppError> {
        let mut drained = 0;
        loop {
            let mut pending = Vec::new();
            for sub in &mut self.subscriptions {
                while let Some(event) = sub.try_recv() {
                    pending.push(event);
                }
            }
            if pending.is_empty() {
                return Ok(drained);
            }
            drained += pending.len();

            let mut new_round = None;
            for event in pending {
                if let Some(round) = self.apply(event) {
                    new_round = Some(round);
                }
            }
            if let Some(round) = new_round {
                self.realign(round).await?;
            }
        }
    }

    /// Wait for the next notification and apply it. `Ok(false)` when there
    /// is nothing left to wait on.
    pub async fn next_event(&mut self) -> Result<bool, AppError> {
        if self.subscriptions.is_empty() {
            return Ok(false);
        }
        let event = {
            let pending = self.subscriptions.iter_mut().map(|s| Box::pin(s.recv()));
            let (event, _, _rest) = select_all(pending).await;
            event
        };
        let Some(event) = event else {
            return Ok(false);
        };
        if let Some(round) = self.apply(event) {
            self.realign(round).await?;
        }
        Ok(true)
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn player_id(&self) -> Uuid {
        self.player_id
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn game(&self) -> Option<&Game> {
        self.mirror.game()
    }

    pub fn player(&self) -> Option<&Player> {
        self.mirror.player(self.player_id)
    }

    pub fn own_riders(&self) -> Vec<&Rider> {
        self.mirror.riders_of(self.player_id)
    }

    pub fn phase(&self) -> Option<RoundPhase> {
        self.mirror.phase()
    }

    pub fn view(&self) -> Option<ClientView> {
        self.mirror.view(self.player_id)
    }

    pub fn subscribed_round(&self) -> Option<u32> {
        self.subscribed_round
    }

    /// An empty draft for the mirrored round.
    pub fn new_draft(&self) -> MoveDraft {
        MoveDraft::new(self.mirror.round().unwrap_or(1))
    }

    pub async fn select_teams(&self, colors: &[TeamColor]) -> Result<Vec<Rider>, AppError> {
        RosterService::new()
            .create_roster(&self.state, self.game_id, self.player_id, colors)
            .await
    }

    pub async fn draw_hand(&self, rider_id: Uuid) -> Result<Rider, AppError> {
        GameFlowService::new()
            .draw_hand(&self.state, self.player_id, rider_id)
            .await
    }

    pub async fn confirm_moves(&self, draft: &MoveDraft) -> Result<Vec<Move>, AppError> {
        GameFlowService::new()
            .confirm_moves(&self.state, self.player_id, draft)
            .await
    }

    pub async fn add_fatigue(&self, rider_id: Uuid) -> Result<Rider, AppError> {
        GameFlowService::new()
            .add_fatigue(&self.state, self.player_id, rider_id)
            .await
    }

    pub async fn advance_round(&self) -> Result<Game, AppError> {
        GameFlowService::new()
            .advance_round(&self.state, self.player_id, self.game_id)
            .await
    }

    /// Release every subscription. Persisted identifiers are kept for resume.
    pub fn disconnect(mut self) {
        self.release();
        info!(game_id = %self.game_id, player_id = %self.player_id, "Session disconnected");
    }

    /// Give up the seat (setup only) and forget the identifiers. A rejected
    /// leave keeps the session connected.
    pub async fn leave(&mut self) -> Result<(), AppError> {
        LobbyService::new()
            .leave_game(&self.state, self.player_id)
            .await?;
        self.release();
        self.identity.clear()
    }

    fn release(&mut self) {
        let store = self.state.store();
        for sub in self.subscriptions.drain(..) {
            store.unsubscribe(sub.id());
        }
        self.subscribed_round = None;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}
