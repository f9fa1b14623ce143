//! Game setup helpers for integration tests
//!
//! Every helper works against one shared `InMemoryStore` with a separate
//! `AppState` per client, the same way two real clients share a backend.

use std::sync::Arc;

use peloton::domain::cards::TeamColor;
use peloton::entities::{Game, Player, Rider};
use peloton::error::AppError;
use peloton::services::lobby::Seat;
use peloton::{build_state, AppState, InMemoryStore, LobbyService, RecordStore, RosterService};

/// Two seated players and the states they act through.
pub struct TwoPlayerGame {
    pub store: Arc<InMemoryStore>,
    pub host_state: AppState,
    pub guest_state: AppState,
    pub game: Game,
    pub host: Player,
    pub guest: Player,
}

impl TwoPlayerGame {
    pub fn host_riders<'a>(&self, riders: &'a [Rider]) -> Vec<&'a Rider> {
        riders.iter().filter(|r| r.player_id == self.host.id).collect()
    }

    pub fn guest_riders<'a>(&self, riders: &'a [Rider]) -> Vec<&'a Rider> {
        riders.iter().filter(|r| r.player_id == self.guest.id).collect()
    }
}

pub fn shared_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new())
}

/// A seeded state on `store`.
pub fn state_on(store: &Arc<InMemoryStore>, seed: u64) -> AppState {
    build_state()
        .with_store(Arc::clone(store) as Arc<dyn RecordStore>)
        .with_seed(seed)
        .build()
        .expect("build test state")
}

/// Host creates, guest joins. Game is still in setup.
pub async fn seated_game(seed: u64) -> Result<TwoPlayerGame, AppError> {
    let store = shared_store();
    let host_state = state_on(&store, seed);
    let guest_state = state_on(&store, seed.wrapping_add(1));

    let lobby = LobbyService::new();
    let Seat { game, player: host } = lobby.create_game(&host_state).await?;
    let Seat { player: guest, .. } = lobby.join_game(&guest_state, &game.join_code).await?;

    Ok(TwoPlayerGame {
        store,
        host_state,
        guest_state,
        game,
        host,
        guest,
    })
}

/// Seated game with teams picked (host Red/Blue). Returns all eight riders.
pub async fn active_game(seed: u64) -> Result<(TwoPlayerGame, Vec<Rider>), AppError> {
    let setup = seated_game(seed).await?;
    let riders = RosterService::new()
        .create_roster(
            &setup.host_state,
            setup.game.id,
            setup.host.id,
            &[TeamColor::Red, TeamColor::Blue],
        )
        .await?;
    Ok((setup, riders))
}
