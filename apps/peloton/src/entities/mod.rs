//! Record shapes held by the shared record store.

pub mod games;
pub mod moves;
pub mod players;
pub mod riders;

pub use games::{Game, GameState};
pub use moves::Move;
pub use players::Player;
pub use riders::Rider;
