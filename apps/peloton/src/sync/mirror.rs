//! Client-side mirror of one game, maintained as a fold over typed events.
//!
//! The mirror never talks to the store. A session feeds it a snapshot and
//! then the change notifications it receives; the same event sequence always
//! produces the same mirror.

use tracing::debug;
use uuid::Uuid;

use crate::domain::ledger::MoveLedger;
use crate::domain::player_view::{client_view, move_summary, ClientView, MoveLine};
use crate::domain::round::{derive_phase, RoundPhase};
use crate::entities::{Game, Move, Player, Rider};
use crate::store::{ChangeEvent, ChangeKind, Record};

/// Full read of one game at a point in time. `moves` holds the moves of the
/// game's current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub game: Game,
    pub players: Vec<Player>,
    pub riders: Vec<Rider>,
    pub moves: Vec<Move>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorEvent {
    SnapshotLoaded(Snapshot),
    Inserted(Record),
    Updated(Record),
    Deleted(Record),
}

impl From<ChangeEvent> for MirrorEvent {
    fn from(event: ChangeEvent) -> Self {
        match event.kind {
            ChangeKind::Insert => MirrorEvent::Inserted(event.record),
            ChangeKind::Update => MirrorEvent::Updated(event.record),
            ChangeKind::Delete => MirrorEvent::Deleted(event.record),
        }
    }
}

/// What applying one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Duplicate, stale, foreign or not applicable to the entity kind.
    Ignored,
    Changed,
    /// The observed round moved; round-scoped subscriptions must be rebuilt.
    RoundChanged { from: u32, to: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mirror {
    game: Option<Game>,
    players: Vec<Player>,
    riders: Vec<Rider>,
    ledger: MoveLedger,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a whole event sequence into a fresh mirror.
    pub fn replay(events: impl IntoIterator<Item = MirrorEvent>) -> Self {
        let mut mirror = Self::new();
        for event in events {
            mirror.apply(event);
        }
        mirror
    }

    pub fn apply(&mut self, event: MirrorEvent) -> Applied {
        match event {
            MirrorEvent::SnapshotLoaded(snapshot) => self.load(snapshot),
            MirrorEvent::Inserted(record) => self.insert(record),
            MirrorEvent::Updated(record) => self.update(record),
            MirrorEvent::Deleted(record) => self.delete(record),
        }
    }

    fn load(&mut self, snapshot: Snapshot) -> Applied {
        let previous = self.round();
        let round = snapshot.game.current_round;

        let mut ledger = MoveLedger::new();
        for mv in snapshot.moves.into_iter().filter(|m| m.round == round) {
            let move_id = mv.id;
            if let Err(e) = ledger.record(mv) {
                debug!(%move_id, error = %e, "Skipping duplicate move in snapshot");
            }
        }
        let mut players = snapshot.players;
        players.sort_by_key(|p| p.role);

        self.game = Some(snapshot.game);
        self.players = players;
        self.riders = snapshot.riders;
        self.ledger = ledger;

        match previous {
            Some(from) if from != round => Applied::RoundChanged { from, to: round },
            _ => Applied::Changed,
        }
    }

    fn owns(&self, game_id: Uuid) -> bool {
        self.game.as_ref().is_some_and(|g| g.id == game_id)
    }

    fn insert(&mut self, record: Record) -> Applied {
        if !self.owns(record.game_id()) {
            return Applied::Ignored;
        }
        match record {
            // Games are created before anyone can subscribe to them.
            Record::Game(_) => Applied::Ignored,
            Record::Player(player) => {
                if self.players.iter().any(|p| p.id == player.id) {
                    return Applied::Ignored;
                }
                self.players.push(player);
                self.players.sort_by_key(|p| p.role);
                Applied::Changed
            }
            Record::Rider(rider) => {
                if self.riders.iter().any(|r| r.id == rider.id) {
                    return Applied::Ignored;
                }
                self.riders.push(rider);
                Applied::Changed
            }
            Record::Move(mv) => {
                if Some(mv.round) != self.round() || self.ledger.contains(mv.id) {
                    return Applied::Ignored;
                }
                match self.ledger.record(mv) {
                    Ok(()) => Applied::Changed,
                    Err(_) => Applied::Ignored,
                }
            }
        }
    }

    fn update(&mut self, record: Record) -> Applied {
        if !self.owns(record.game_id()) {
            return Applied::Ignored;
        }
        match record {
            Record::Game(game) => {
                let Some(current) = self.game.as_mut() else {
                    return Applied::Ignored;
                };
                if game.lock_version <= current.lock_version {
                    return Applied::Ignored;
                }
                let from = current.current_round;
                let to = game.current_round;
                *current = game;
                if from != to {
                    self.ledger.retain_round(to);
                    Applied::RoundChanged { from, to }
                } else {
                    Applied::Changed
                }
            }
            Record::Player(player) => {
                match self.players.iter_mut().find(|p| p.id == player.id) {
                    Some(slot) if player.lock_version > slot.lock_version => {
                        *slot = player;
                        Applied::Changed
                    }
                    _ => Applied::Ignored,
                }
            }
            Record::Rider(rider) => match self.riders.iter_mut().find(|r| r.id == rider.id) {
                Some(slot) if rider.lock_version > slot.lock_version => {
                    *slot = rider;
                    Applied::Changed
                }
                _ => Applied::Ignored,
            },
            // Moves are immutable.
            Record::Move(_) => Applied::Ignored,
        }
    }

    fn delete(&mut self, record: Record) -> Applied {
        match record {
            Record::Player(player) if self.owns(player.game_id) => {
                let before = self.players.len();
                self.players.retain(|p| p.id != player.id);
                if self.players.len() < before {
                    Applied::Changed
                } else {
                    Applied::Ignored
                }
            }
            _ => Applied::Ignored,
        }
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn riders(&self) -> &[Rider] {
        &self.riders
    }

    pub fn ledger(&self) -> &MoveLedger {
        &self.ledger
    }

    pub fn round(&self) -> Option<u32> {
        self.game.as_ref().map(|g| g.current_round)
    }

    pub fn player(&self, player_id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn rider(&self, rider_id: Uuid) -> Option<&Rider> {
        self.riders.iter().find(|r| r.id == rider_id)
    }

    pub fn riders_of(&self, player_id: Uuid) -> Vec<&Rider> {
        self.riders
            .iter()
            .filter(|r| r.player_id == player_id)
            .collect()
    }

    pub fn phase(&self) -> Option<RoundPhase> {
        self.game
            .as_ref()
            .map(|g| derive_phase(g, &self.players, &self.riders, &self.ledger))
    }

    pub fn view(&self, local_player_id: Uuid) -> Option<ClientView> {
        self.game.as_ref().map(|g| {
            client_view(g, local_player_id, &self.players, &self.riders, &self.ledger)
        })
    }

    /// The player's moves in the mirrored round.
    pub fn move_summary(&self, player_id: Uuid) -> Vec<MoveLine> {
        match self.round() {
            Some(round) => move_summary(player_id, round, &self.riders, &self.ledger),
            None => Vec::new(),
        }
    }
}
