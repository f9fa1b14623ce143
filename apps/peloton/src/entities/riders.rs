use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::cards::{Card, RiderType, TeamColor};
use crate::domain::deck::CardPiles;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    pub id: Uuid,
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub rider_type: RiderType,
    pub color: TeamColor,
    pub deck: Vec<Card>,
    pub hand: Vec<Card>,
    pub discard: Vec<Card>,
    pub lock_version: i32,
    pub updated_at: OffsetDateTime,
}

impl Rider {
    pub fn new(
        game_id: Uuid,
        player_id: Uuid,
        rider_type: RiderType,
        color: TeamColor,
        piles: CardPiles,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            player_id,
            rider_type,
            color,
            deck: piles.deck,
            hand: piles.hand,
            discard: piles.discard,
            lock_version: 1,
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn piles(&self) -> CardPiles {
        CardPiles {
            deck: self.deck.clone(),
            hand: self.hand.clone(),
            discard: self.discard.clone(),
        }
    }

    /// e.g. "Red Sprinter".
    pub fn label(&self) -> String {
        format!("{} {}", self.color, self.rider_type)
    }
}
