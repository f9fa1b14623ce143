//! Move repository functions. Moves are insert-only.

use uuid::Uuid;

use super::narrow_all;
use crate::entities::Move;
use crate::errors::domain::DomainError;
use crate::store::{Filter, Record, RecordStore, Table};

pub async fn list_for_round<S: RecordStore + ?Sized>(
    store: &S,
    game_id: Uuid,
    round: u32,
) -> Result<Vec<Move>, DomainError> {
    let records = store
        .select(Table::Moves, Filter::GameRound { game_id, round })
        .await?;
    narrow_all(records, Table::Moves, Record::into_move)
}

pub async fn exists_for_rider<S: RecordStore + ?Sized>(
    store: &S,
    rider_id: Uuid,
    round: u32,
) -> Result<bool, DomainError> {
    Ok(store
        .get(Table::Moves, Filter::RiderRound { rider_id, round })
        .await?
        .is_some())
}
