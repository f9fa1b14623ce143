//! Rider repository functions.

use uuid::Uuid;

use super::{narrow, narrow_all};
use crate::domain::deck::CardPiles;
use crate::entities::Rider;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::store::{Filter, Patch, Record, RecordStore, RiderPatch, Table, Write};

pub async fn require<S: RecordStore + ?Sized>(
    store: &S,
    rider_id: Uuid,
) -> Result<Rider, DomainError> {
    store
        .get(Table::Riders, Filter::Id(rider_id))
        .await?
        .map(|r| narrow(r, Table::Riders, Record::into_rider))
        .transpose()?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Rider, format!("Rider {rider_id} not found"))
        })
}

pub async fn list_for_game<S: RecordStore + ?Sized>(
    store: &S,
    game_id: Uuid,
) -> Result<Vec<Rider>, DomainError> {
    let records = store.select(Table::Riders, Filter::GameId(game_id)).await?;
    narrow_all(records, Table::Riders, Record::into_rider)
}

/// Replace all three piles, guarded by the version the caller read.
pub fn piles_write(rider: &Rider, piles: CardPiles) -> Write {
    Write::guarded(
        rider.id,
        Patch::Rider(RiderPatch::from(piles)),
        rider.lock_version,
    )
}

pub async fn update_piles<S: RecordStore + ?Sized>(
    store: &S,
    rider: &Rider,
    piles: CardPiles,
) -> Result<Rider, DomainError> {
    let record = store
        .update(
            rider.id,
            Patch::Rider(RiderPatch::from(piles)),
            Some(rider.lock_version),
        )
        .await?;
    narrow(record, Table::Riders, Record::into_rider)
}
