use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::cards::Card;

/// A confirmed card choice for one rider in one round. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub id: Uuid,
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub rider_id: Uuid,
    pub card: Card,
    pub round: u32,
    pub created_at: OffsetDateTime,
}

impl Move {
    pub fn new(game_id: Uuid, player_id: Uuid, rider_id: Uuid, card: Card, round: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            player_id,
            rider_id,
            card,
            round,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
