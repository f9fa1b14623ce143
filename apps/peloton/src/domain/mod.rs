//! Domain layer: pure game logic types and helpers.

pub mod cards;
pub mod deck;
pub mod draft;
pub mod ledger;
pub mod player_view;
pub mod roles;
pub mod roster;
pub mod round;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_deck;
#[cfg(test)]
mod tests_props_ledger;

// Re-exports for ergonomics
pub use cards::{Card, RiderType, TeamColor};
pub use deck::{add_fatigue_card, choose_card, draw, resolve_choice, CardPiles, DrawOutcome};
pub use draft::MoveDraft;
pub use ledger::MoveLedger;
pub use player_view::{client_view, move_summary, ClientView, MoveLine, RiderSummary};
pub use roles::{require_host, require_rider_owner, HostAction, PlayerRole};
pub use roster::{plan_roster, split_colors, TeamSplit};
pub use round::{derive_phase, plan_advance, require_selecting, RoundPhase};
