//! Record store contract.
//!
//! The store is the single source of truth shared by both clients. It keeps
//! keyed records per table, applies batches of writes atomically, and fans
//! change notifications out to filtered subscriptions.

pub mod memory;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::cards::Card;
use crate::domain::deck::CardPiles;
use crate::entities::{Game, GameState, Move, Player, Rider};

pub use memory::InMemoryStore;
pub use registry::SubscriptionRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Games,
    Players,
    Riders,
    Moves,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Games, Table::Players, Table::Riders, Table::Moves];

    pub const fn name(self) -> &'static str {
        match self {
            Table::Games => "games",
            Table::Players => "players",
            Table::Riders => "riders",
            Table::Moves => "moves",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Game(Game),
    Player(Player),
    Rider(Rider),
    Move(Move),
}

impl Record {
    pub fn table(&self) -> Table {
        match self {
            Record::Game(_) => Table::Games,
            Record::Player(_) => Table::Players,
            Record::Rider(_) => Table::Riders,
            Record::Move(_) => Table::Moves,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Record::Game(g) => g.id,
            Record::Player(p) => p.id,
            Record::Rider(r) => r.id,
            Record::Move(m) => m.id,
        }
    }

    /// Owning game; a game is its own owner.
    pub fn game_id(&self) -> Uuid {
        match self {
            Record::Game(g) => g.id,
            Record::Player(p) => p.game_id,
            Record::Rider(r) => r.game_id,
            Record::Move(m) => m.game_id,
        }
    }

    /// Moves are immutable and carry no version.
    pub fn lock_version(&self) -> Option<i32> {
        match self {
            Record::Game(g) => Some(g.lock_version),
            Record::Player(p) => Some(p.lock_version),
            Record::Rider(r) => Some(r.lock_version),
            Record::Move(_) => None,
        }
    }

    /// Bump the version after a successful update.
    fn touch(&mut self, now: OffsetDateTime) {
        match self {
            Record::Game(g) => {
                g.lock_version += 1;
                g.updated_at = now;
            }
            Record::Player(p) => p.lock_version += 1,
            Record::Rider(r) => {
                r.lock_version += 1;
                r.updated_at = now;
            }
            Record::Move(_) => {}
        }
    }

    pub fn into_game(self) -> Option<Game> {
        match self {
            Record::Game(g) => Some(g),
            _ => None,
        }
    }

    pub fn into_player(self) -> Option<Player> {
        match self {
            Record::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_rider(self) -> Option<Rider> {
        match self {
            Record::Rider(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_move(self) -> Option<Move> {
        match self {
            Record::Move(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Game> for Record {
    fn from(g: Game) -> Self {
        Record::Game(g)
    }
}

impl From<Player> for Record {
    fn from(p: Player) -> Self {
        Record::Player(p)
    }
}

impl From<Rider> for Record {
    fn from(r: Rider) -> Self {
        Record::Rider(r)
    }
}

impl From<Move> for Record {
    fn from(m: Move) -> Self {
        Record::Move(m)
    }
}

/// Row predicate used by selects and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Id(Uuid),
    GameId(Uuid),
    JoinCode(String),
    /// Moves of one game in one round.
    GameRound { game_id: Uuid, round: u32 },
    /// The move of one rider in one round.
    RiderRound { rider_id: Uuid, round: u32 },
}

impl Filter {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => record.id() == *id,
            Filter::GameId(game_id) => record.game_id() == *game_id,
            Filter::JoinCode(code) => {
                matches!(record, Record::Game(g) if g.join_code == *code)
            }
            Filter::GameRound { game_id, round } => {
                matches!(record, Record::Move(m) if m.game_id == *game_id && m.round == *round)
            }
            Filter::RiderRound { rider_id, round } => {
                matches!(record, Record::Move(m) if m.rider_id == *rider_id && m.round == *round)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    const fn bit(self) -> u8 {
        match self {
            ChangeKind::Insert => 0b001,
            ChangeKind::Update => 0b010,
            ChangeKind::Delete => 0b100,
        }
    }
}

/// Set of change kinds a subscription wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMask(u8);

impl EventMask {
    pub const ALL: EventMask = EventMask(0b111);

    pub const fn only(kind: ChangeKind) -> Self {
        EventMask(kind.bit())
    }

    pub const fn with(self, kind: ChangeKind) -> Self {
        EventMask(self.0 | kind.bit())
    }

    pub const fn contains(self, kind: ChangeKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

/// A committed change. `record` is the row after the write, or the removed
/// row for deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub record: Record,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamePatch {
    pub state: Option<GameState>,
    pub current_round: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerPatch {
    pub last_seen_at: Option<OffsetDateTime>,
}

/// Replaces all three piles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiderPatch {
    pub deck: Vec<Card>,
    pub hand: Vec<Card>,
    pub discard: Vec<Card>,
}

impl From<CardPiles> for RiderPatch {
    fn from(piles: CardPiles) -> Self {
        Self {
            deck: piles.deck,
            hand: piles.hand,
            discard: piles.discard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    Game(GamePatch),
    Player(PlayerPatch),
    Rider(RiderPatch),
}

impl Patch {
    pub fn table(&self) -> Table {
        match self {
            Patch::Game(_) => Table::Games,
            Patch::Player(_) => Table::Players,
            Patch::Rider(_) => Table::Riders,
        }
    }

    fn apply(self, record: &mut Record) -> Result<(), StoreError> {
        match (self, record) {
            (Patch::Game(p), Record::Game(g)) => {
                if let Some(state) = p.state {
                    g.state = state;
                }
                if let Some(round) = p.current_round {
                    g.current_round = round;
                }
                Ok(())
            }
            (Patch::Player(p), Record::Player(player)) => {
                if let Some(seen) = p.last_seen_at {
                    player.last_seen_at = seen;
                }
                Ok(())
            }
            (Patch::Rider(p), Record::Rider(r)) => {
                r.deck = p.deck;
                r.hand = p.hand;
                r.discard = p.discard;
                Ok(())
            }
            (_, record) => Err(StoreError::PatchMismatch {
                table: record.table(),
            }),
        }
    }
}

/// One step of an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Insert(Record),
    Update {
        id: Uuid,
        patch: Patch,
        /// Fails with `VersionMismatch` unless the stored version equals this.
        expected_version: Option<i32>,
    },
    Delete {
        table: Table,
        id: Uuid,
    },
}

impl Write {
    pub fn insert(record: impl Into<Record>) -> Self {
        Write::Insert(record.into())
    }

    pub fn update(id: Uuid, patch: Patch) -> Self {
        Write::Update {
            id,
            patch,
            expected_version: None,
        }
    }

    pub fn guarded(id: Uuid, patch: Patch, expected_version: i32) -> Self {
        Write::Update {
            id,
            patch,
            expected_version: Some(expected_version),
        }
    }

    pub fn table(&self) -> Table {
        match self {
            Write::Insert(record) => record.table(),
            Write::Update { patch, .. } => patch.table(),
            Write::Delete { table, .. } => *table,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("{table} record {id} not found")]
    RecordNotFound { table: Table, id: Uuid },
    #[error("unique constraint {constraint} violated on {table}")]
    UniqueViolation {
        table: Table,
        constraint: &'static str,
    },
    #[error("{table} record {id} is at version {actual}, expected {expected}")]
    VersionMismatch {
        table: Table,
        id: Uuid,
        expected: i32,
        actual: i32,
    },
    #[error("patch does not apply to {table}")]
    PatchMismatch { table: Table },
    #[error("write rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        SubscriptionId(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Live change feed. Dropping it unsubscribes.
pub struct Subscription {
    id: SubscriptionId,
    table: Table,
    receiver: mpsc::UnboundedReceiver<ChangeEvent>,
    registry: Arc<SubscriptionRegistry>,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriptionId,
        table: Table,
        receiver: mpsc::UnboundedReceiver<ChangeEvent>,
        registry: Arc<SubscriptionRegistry>,
    ) -> Self {
        Self {
            id,
            table,
            receiver,
            registry,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn table(&self) -> Table {
        self.table
    }

    /// Next event; `None` once the feed is closed.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.recv().await
    }

    /// Next already-delivered event, without waiting.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.try_recv().ok()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("table", &self.table)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Apply `writes` all-or-nothing. Returns the resulting record of each
    /// write in order (the removed record for deletes).
    async fn commit(&self, writes: Vec<Write>) -> Result<Vec<Record>, StoreError>;

    async fn select(&self, table: Table, filter: Filter) -> Result<Vec<Record>, StoreError>;

    /// Register a change feed for `table` limited to `events` and `filter`.
    fn subscribe(&self, table: Table, events: EventMask, filter: Filter) -> Subscription;

    /// Release a feed by id. Returns false when it was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    async fn insert(&self, record: Record) -> Result<Record, StoreError> {
        single(self.commit(vec![Write::Insert(record)]).await?)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: Patch,
        expected_version: Option<i32>,
    ) -> Result<Record, StoreError> {
        single(
            self.commit(vec![Write::Update {
                id,
                patch,
                expected_version,
            }])
            .await?,
        )
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<Record, StoreError> {
        single(self.commit(vec![Write::Delete { table, id }]).await?)
    }

    /// First matching record, if any.
    async fn get(&self, table: Table, filter: Filter) -> Result<Option<Record>, StoreError> {
        Ok(self.select(table, filter).await?.into_iter().next())
    }
}

fn single(records: Vec<Record>) -> Result<Record, StoreError> {
    records
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Rejected("commit returned no record".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roles::PlayerRole;

    #[test]
    fn event_mask_combines_kinds() {
        let mask = EventMask::only(ChangeKind::Insert).with(ChangeKind::Update);
        assert!(mask.contains(ChangeKind::Insert));
        assert!(mask.contains(ChangeKind::Update));
        assert!(!mask.contains(ChangeKind::Delete));
        assert!(EventMask::ALL.contains(ChangeKind::Delete));
    }

    #[test]
    fn filters_match_by_kind() {
        let game = Game::new("ABCDEF");
        let player = Player::new(game.id, PlayerRole::Host);
        let mv = Move::new(game.id, player.id, Uuid::new_v4(), Card::new(4), 2);

        let game_rec = Record::from(game.clone());
        let move_rec = Record::from(mv.clone());

        assert!(Filter::JoinCode("ABCDEF".into()).matches(&game_rec));
        assert!(!Filter::JoinCode("ABCDEF".into()).matches(&move_rec));
        assert!(Filter::GameId(game.id).matches(&game_rec));
        assert!(Filter::GameId(game.id).matches(&Record::from(player)));
        assert!(Filter::GameRound {
            game_id: game.id,
            round: 2
        }
        .matches(&move_rec));
        assert!(!Filter::GameRound {
            game_id: game.id,
            round: 1
        }
        .matches(&move_rec));
        assert!(Filter::RiderRound {
            rider_id: mv.rider_id,
            round: 2
        }
        .matches(&move_rec));
    }

    #[test]
    fn patch_must_match_record_kind() {
        let mut rec = Record::from(Game::new("ABCDEF"));
        let err = Patch::Rider(RiderPatch::default())
            .apply(&mut rec)
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::PatchMismatch {
                table: Table::Games
            }
        );

        Patch::Game(GamePatch {
            current_round: Some(4),
            ..GamePatch::default()
        })
        .apply(&mut rec)
        .unwrap();
        assert_eq!(rec.into_game().map(|g| g.current_round), Some(4));
    }
}
