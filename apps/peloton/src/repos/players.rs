//! Player repository functions.

use time::OffsetDateTime;
use uuid::Uuid;

use super::{narrow, narrow_all};
use crate::entities::Player;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::store::{Filter, Patch, PlayerPatch, Record, RecordStore, Table};

pub async fn find_by_id<S: RecordStore + ?Sized>(
    store: &S,
    player_id: Uuid,
) -> Result<Option<Player>, DomainError> {
    store
        .get(Table::Players, Filter::Id(player_id))
        .await?
        .map(|r| narrow(r, Table::Players, Record::into_player))
        .transpose()
}

pub async fn require<S: RecordStore + ?Sized>(
    store: &S,
    player_id: Uuid,
) -> Result<Player, DomainError> {
    find_by_id(store, player_id).await?.ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Player,
            format!("Player {player_id} not found"),
        )
    })
}

/// Players of a game in join order.
pub async fn list_for_game<S: RecordStore + ?Sized>(
    store: &S,
    game_id: Uuid,
) -> Result<Vec<Player>, DomainError> {
    let records = store.select(Table::Players, Filter::GameId(game_id)).await?;
    let mut players = narrow_all(records, Table::Players, Record::into_player)?;
    players.sort_by_key(|p| p.role);
    Ok(players)
}

pub async fn create<S: RecordStore + ?Sized>(
    store: &S,
    player: Player,
) -> Result<Player, DomainError> {
    let record = store.insert(player.into()).await?;
    narrow(record, Table::Players, Record::into_player)
}

pub async fn touch_last_seen<S: RecordStore + ?Sized>(
    store: &S,
    player_id: Uuid,
) -> Result<Player, DomainError> {
    let patch = Patch::Player(PlayerPatch {
        last_seen_at: Some(OffsetDateTime::now_utc()),
    });
    let record = store.update(player_id, patch, None).await?;
    narrow(record, Table::Players, Record::into_player)
}

pub async fn remove<S: RecordStore + ?Sized>(
    store: &S,
    player_id: Uuid,
) -> Result<Player, DomainError> {
    let record = store.delete(Table::Players, player_id).await?;
    narrow(record, Table::Players, Record::into_player)
}
