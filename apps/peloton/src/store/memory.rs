//! In-process record store used by tests and the simulation binary.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use time::OffsetDateTime;
use tracing::{debug, warn};

use super::{
    ChangeEvent, ChangeKind, EventMask, Filter, Record, RecordStore, StoreError, Subscription,
    SubscriptionId, SubscriptionRegistry, Table, Write,
};

type Tables = HashMap<Table, Vec<Record>>;

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    registry: Arc<SubscriptionRegistry>,
    faults: Mutex<HashSet<Table>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next commit that touches `table` with `Unavailable`.
    pub fn inject_fault(&self, table: Table) {
        self.faults.lock().insert(table);
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    pub fn count(&self, table: Table) -> usize {
        self.tables.read().get(&table).map_or(0, Vec::len)
    }

    fn take_fault(&self, writes: &[Write]) -> Option<Table> {
        let mut faults = self.faults.lock();
        writes
            .iter()
            .map(Write::table)
            .find(|table| faults.remove(table))
    }
}

fn primary_key(table: Table) -> &'static str {
    match table {
        Table::Games => "games_pkey",
        Table::Players => "players_pkey",
        Table::Riders => "riders_pkey",
        Table::Moves => "moves_pkey",
    }
}

/// Name of the unique constraint `candidate` would break against `existing`.
fn conflicting_constraint(existing: &Record, candidate: &Record) -> Option<&'static str> {
    if existing.id() == candidate.id() {
        return Some(primary_key(candidate.table()));
    }
    match (existing, candidate) {
        (Record::Game(a), Record::Game(b)) if a.join_code == b.join_code => {
            Some("games_join_code_key")
        }
        (Record::Player(a), Record::Player(b)) if a.game_id == b.game_id && a.role == b.role => {
            Some("players_game_role_key")
        }
        (Record::Rider(a), Record::Rider(b))
            if a.game_id == b.game_id && a.color == b.color && a.rider_type == b.rider_type =>
        {
            Some("riders_game_color_type_key")
        }
        (Record::Move(a), Record::Move(b)) if a.rider_id == b.rider_id && a.round == b.round => {
            Some("moves_rider_round_key")
        }
        _ => None,
    }
}

fn apply_write(
    tables: &mut Tables,
    write: Write,
    now: OffsetDateTime,
) -> Result<(Record, ChangeKind), StoreError> {
    match write {
        Write::Insert(record) => {
            let table = record.table();
            let rows = tables.entry(table).or_default();
            if let Some(constraint) = rows
                .iter()
                .find_map(|row| conflicting_constraint(row, &record))
            {
                return Err(StoreError::UniqueViolation { table, constraint });
            }
            rows.push(record.clone());
            Ok((record, ChangeKind::Insert))
        }
        Write::Update {
            id,
            patch,
            expected_version,
        } => {
            let table = patch.table();
            let row = tables
                .get_mut(&table)
                .and_then(|rows| rows.iter_mut().find(|r| r.id() == id))
                .ok_or(StoreError::RecordNotFound { table, id })?;
            if let (Some(expected), Some(actual)) = (expected_version, row.lock_version()) {
                if expected != actual {
                    return Err(StoreError::VersionMismatch {
                        table,
                        id,
                        expected,
                        actual,
                    });
                }
            }
            let mut updated = row.clone();
            patch.apply(&mut updated)?;
            updated.touch(now);
            *row = updated.clone();
            Ok((updated, ChangeKind::Update))
        }
        Write::Delete { table, id } => {
            let rows = tables
                .get_mut(&table)
                .ok_or(StoreError::RecordNotFound { table, id })?;
            let idx = rows
                .iter()
                .position(|r| r.id() == id)
                .ok_or(StoreError::RecordNotFound { table, id })?;
            Ok((rows.remove(idx), ChangeKind::Delete))
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn commit(&self, writes: Vec<Write>) -> Result<Vec<Record>, StoreError> {
        if let Some(table) = self.take_fault(&writes) {
            warn!(table = %table, "Injected store fault");
            return Err(StoreError::Unavailable(format!("{table} is unavailable")));
        }

        let batch_len = writes.len();
        let now = OffsetDateTime::now_utc();
        let events = {
            let mut tables = self.tables.write();
            // Writes land on a copy; the live tables are replaced only when
            // every write succeeded.
            let mut staged = tables.clone();
            let mut events = Vec::with_capacity(batch_len);
            for write in writes {
                let (record, kind) = apply_write(&mut staged, write, now)?;
                events.push(ChangeEvent {
                    table: record.table(),
                    kind,
                    record,
                });
            }
            *tables = staged;
            events
        };

        debug!(writes = batch_len, "Store batch committed");
        for event in &events {
            self.registry.publish(event);
        }
        Ok(events.into_iter().map(|e| e.record).collect())
    }

    async fn select(&self, table: Table, filter: Filter) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| filter.matches(r))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn subscribe(&self, table: Table, events: EventMask, filter: Filter) -> Subscription {
        self.registry.register(table, events, filter)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.registry.unregister(id)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::cards::{Card, RiderType, TeamColor};
    use crate::domain::deck::CardPiles;
    use crate::domain::roles::PlayerRole;
    use crate::entities::{Game, GameState, Move, Player, Rider};
    use crate::store::{GamePatch, Patch, RiderPatch};

    fn started_game() -> (Game, Player) {
        let game = Game::new("ABCDEF");
        let host = Player::new(game.id, PlayerRole::Host);
        (game, host)
    }

    #[tokio::test]
    async fn insert_then_select() {
        let store = InMemoryStore::new();
        let (game, host) = started_game();
        store.insert(game.clone().into()).await.unwrap();
        store.insert(host.clone().into()).await.unwrap();

        let found = store
            .get(Table::Games, Filter::JoinCode("ABCDEF".into()))
            .await
            .unwrap()
            .and_then(Record::into_game);
        assert_eq!(found, Some(game.clone()));

        let players = store
            .select(Table::Players, Filter::GameId(game.id))
            .await
            .unwrap();
        assert_eq!(players.len(), 1);
    }

    #[tokio::test]
    async fn unique_constraints_are_named() {
        let store = InMemoryStore::new();
        let (game, host) = started_game();
        store.insert(game.clone().into()).await.unwrap();
        store.insert(host.clone().into()).await.unwrap();

        let dup_code = Game::new("ABCDEF");
        assert_eq!(
            store.insert(dup_code.into()).await.unwrap_err(),
            StoreError::UniqueViolation {
                table: Table::Games,
                constraint: "games_join_code_key"
            }
        );

        let second_host = Player::new(game.id, PlayerRole::Host);
        assert_eq!(
            store.insert(second_host.into()).await.unwrap_err(),
            StoreError::UniqueViolation {
                table: Table::Players,
                constraint: "players_game_role_key"
            }
        );

        let rider_id = Uuid::new_v4();
        let mv = Move::new(game.id, host.id, rider_id, Card::new(3), 1);
        store.insert(mv.into()).await.unwrap();
        let again = Move::new(game.id, host.id, rider_id, Card::new(5), 1);
        assert_eq!(
            store.insert(again.into()).await.unwrap_err(),
            StoreError::UniqueViolation {
                table: Table::Moves,
                constraint: "moves_rider_round_key"
            }
        );
    }

    #[tokio::test]
    async fn failed_batch_leaves_nothing_behind() {
        let store = InMemoryStore::new();
        let (game, host) = started_game();
        store.insert(game.clone().into()).await.unwrap();

        let rider = Rider::new(
            game.id,
            host.id,
            RiderType::Sprinter,
            TeamColor::Red,
            CardPiles::default(),
        );
        let batch = vec![
            Write::insert(rider.clone()),
            Write::update(
                game.id,
                Patch::Game(GamePatch {
                    state: Some(GameState::Active),
                    ..GamePatch::default()
                }),
            ),
            // Same rider again: the whole batch must roll back.
            Write::insert(rider),
        ];
        assert!(store.commit(batch).await.is_err());
        assert_eq!(store.count(Table::Riders), 0);

        let stored = store
            .get(Table::Games, Filter::Id(game.id))
            .await
            .unwrap()
            .and_then(Record::into_game)
            .unwrap();
        assert_eq!(stored.state, GameState::Setup);
        assert_eq!(stored.lock_version, 1);
    }

    #[tokio::test]
    async fn guarded_update_checks_version() {
        let store = InMemoryStore::new();
        let (game, _) = started_game();
        store.insert(game.clone().into()).await.unwrap();

        let patch = Patch::Game(GamePatch {
            current_round: Some(2),
            ..GamePatch::default()
        });
        let updated = store
            .update(game.id, patch.clone(), Some(1))
            .await
            .unwrap()
            .into_game()
            .unwrap();
        assert_eq!(updated.current_round, 2);
        assert_eq!(updated.lock_version, 2);

        assert_eq!(
            store.update(game.id, patch, Some(1)).await.unwrap_err(),
            StoreError::VersionMismatch {
                table: Table::Games,
                id: game.id,
                expected: 1,
                actual: 2
            }
        );
    }

    #[tokio::test]
    async fn updates_to_missing_records_fail() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();
        assert_eq!(
            store
                .update(id, Patch::Rider(RiderPatch::default()), None)
                .await
                .unwrap_err(),
            StoreError::RecordNotFound {
                table: Table::Riders,
                id
            }
        );
        assert!(store.delete(Table::Players, id).await.is_err());
    }

    #[tokio::test]
    async fn injected_fault_is_one_shot() {
        let store = InMemoryStore::new();
        store.inject_fault(Table::Games);
        let (game, _) = started_game();
        assert!(matches!(
            store.insert(game.clone().into()).await,
            Err(StoreError::Unavailable(_))
        ));
        store.insert(game.into()).await.unwrap();
    }

    #[tokio::test]
    async fn commits_notify_matching_subscribers() {
        let store = InMemoryStore::new();
        let (game, host) = started_game();
        let mut players = store.subscribe(Table::Players, EventMask::ALL, Filter::GameId(game.id));
        let mut games = store.subscribe(
            Table::Games,
            EventMask::only(ChangeKind::Update),
            Filter::Id(game.id),
        );

        store.insert(game.clone().into()).await.unwrap();
        store.insert(host.clone().into()).await.unwrap();
        store.delete(Table::Players, host.id).await.unwrap();

        let kinds: Vec<ChangeKind> = std::iter::from_fn(|| players.try_recv())
            .map(|e| e.kind)
            .collect();
        assert_eq!(kinds, vec![ChangeKind::Insert, ChangeKind::Delete]);
        // Game insert is not an update.
        assert!(games.try_recv().is_none());

        assert_eq!(store.subscriber_count(), 2);
        drop(players);
        drop(games);
        assert_eq!(store.subscriber_count(), 0);
    }
}
