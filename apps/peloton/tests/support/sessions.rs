//! Session pairs for synchronizer tests.

use std::sync::Arc;

use peloton::error::AppError;
use peloton::sync::{IdentityStore, MemoryIdentityStore};
use peloton::{AppState, InMemoryStore, Session};

use super::game_setup::{shared_store, state_on};

pub struct SessionPair {
    pub store: Arc<InMemoryStore>,
    pub host: Session,
    pub guest: Session,
    pub host_identity: Arc<MemoryIdentityStore>,
    pub guest_identity: Arc<MemoryIdentityStore>,
    pub host_state: AppState,
    pub guest_state: AppState,
}

/// Host session creates the game and the guest session joins it. Both
/// mirrors are synced before returning.
pub async fn connected_pair(seed: u64) -> Result<SessionPair, AppError> {
    let store = shared_store();
    let host_state = state_on(&store, seed);
    let guest_state = state_on(&store, seed.wrapping_add(1));
    let host_identity = Arc::new(MemoryIdentityStore::new());
    let guest_identity = Arc::new(MemoryIdentityStore::new());

    let mut host = Session::create(
        host_state.clone(),
        Arc::clone(&host_identity) as Arc<dyn IdentityStore>,
    )
    .await?;
    let code = host.game().expect("host mirror has a game").join_code.clone();
    let guest = Session::join(
        guest_state.clone(),
        Arc::clone(&guest_identity) as Arc<dyn IdentityStore>,
        &code,
    )
    .await?;
    host.sync().await?;

    Ok(SessionPair {
        store,
        host,
        guest,
        host_identity,
        guest_identity,
        host_state,
        guest_state,
    })
}

/// Draw for every owned rider, then select the first card of each hand and
/// confirm.
pub async fn play_first_cards(session: &mut Session) -> Result<(), AppError> {
    let ids: Vec<_> = session.own_riders().iter().map(|r| r.id).collect();
    for id in ids {
        session.draw_hand(id).await?;
    }
    session.sync().await?;

    let mut draft = session.new_draft();
    for rider in session.own_riders() {
        draft.select(rider, 0)?;
    }
    session.confirm_moves(&draft).await?;
    Ok(())
}
