use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::roles::PlayerRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub game_id: Uuid,
    pub role: PlayerRole,
    pub joined_at: OffsetDateTime,
    /// Touched on resume so the other client sees the reconnect.
    pub last_seen_at: OffsetDateTime,
    pub lock_version: i32,
}

impl Player {
    pub fn new(game_id: Uuid, role: PlayerRole) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            game_id,
            role,
            joined_at: now,
            last_seen_at: now,
            lock_version: 1,
        }
    }

    /// "Player 1" / "Player 2".
    pub fn display_name(&self) -> &'static str {
        self.role.display_name()
    }

    pub fn is_host(&self) -> bool {
        self.role == PlayerRole::Host
    }
}
