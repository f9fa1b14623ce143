//! Game repository functions.

use uuid::Uuid;

use super::narrow;
use crate::entities::{Game, GameState, Player};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::store::{Filter, GamePatch, Patch, Record, RecordStore, Table, Write};

pub async fn find_by_id<S: RecordStore + ?Sized>(
    store: &S,
    game_id: Uuid,
) -> Result<Option<Game>, DomainError> {
    store
        .get(Table::Games, Filter::Id(game_id))
        .await?
        .map(|r| narrow(r, Table::Games, Record::into_game))
        .transpose()
}

pub async fn require<S: RecordStore + ?Sized>(
    store: &S,
    game_id: Uuid,
) -> Result<Game, DomainError> {
    find_by_id(store, game_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
    })
}

/// Exact match on an already-normalized code.
pub async fn find_by_join_code<S: RecordStore + ?Sized>(
    store: &S,
    join_code: &str,
) -> Result<Option<Game>, DomainError> {
    store
        .get(Table::Games, Filter::JoinCode(join_code.to_string()))
        .await?
        .map(|r| narrow(r, Table::Games, Record::into_game))
        .transpose()
}

/// `setup -> active`, guarded by the version the caller read.
pub fn activate_write(game: &Game) -> Write {
    Write::guarded(
        game.id,
        Patch::Game(GamePatch {
            state: Some(GameState::Active),
            ..GamePatch::default()
        }),
        game.lock_version,
    )
}

/// Move to `round`, guarded by the version the caller read.
pub async fn set_round<S: RecordStore + ?Sized>(
    store: &S,
    game: &Game,
    round: u32,
) -> Result<Game, DomainError> {
    let patch = Patch::Game(GamePatch {
        current_round: Some(round),
        ..GamePatch::default()
    });
    let record = store
        .update(game.id, patch, Some(game.lock_version))
        .await?;
    narrow(record, Table::Games, Record::into_game)
}

/// Insert a game and its host in one batch.
pub async fn create_with_host<S: RecordStore + ?Sized>(
    store: &S,
    game: Game,
    host: Player,
) -> Result<(Game, Player), DomainError> {
    let mut records = store
        .commit(vec![Write::insert(game), Write::insert(host)])
        .await?
        .into_iter();
    let (Some(game), Some(host)) = (records.next(), records.next()) else {
        return Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            "Game creation returned too few records",
        ));
    };
    Ok((
        narrow(game, Table::Games, Record::into_game)?,
        narrow(host, Table::Players, Record::into_player)?,
    ))
}
