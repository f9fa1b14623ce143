// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::cards::{Card, RiderType, TeamColor};
use crate::domain::deck::CardPiles;

/// Generate a RiderType
pub fn rider_type() -> impl Strategy<Value = RiderType> {
    prop_oneof![Just(RiderType::Sprinter), Just(RiderType::Rouleur)]
}

/// Generate a TeamColor
pub fn team_color() -> impl Strategy<Value = TeamColor> {
    prop_oneof![
        Just(TeamColor::Red),
        Just(TeamColor::Black),
        Just(TeamColor::Green),
        Just(TeamColor::Blue),
    ]
}

/// Card with a value that occurs in some starting deck (2..=9, no 8).
pub fn card() -> impl Strategy<Value = Card> {
    prop_oneof![
        Just(2u8),
        Just(3u8),
        Just(4u8),
        Just(5u8),
        Just(6u8),
        Just(7u8),
        Just(9u8),
    ]
    .prop_map(Card::new)
}

/// Piles with an empty hand and arbitrary deck/discard contents.
pub fn drawable_piles(max_len: usize) -> impl Strategy<Value = CardPiles> {
    (
        prop::collection::vec(card(), 0..=max_len),
        prop::collection::vec(card(), 0..=max_len),
    )
        .prop_map(|(deck, discard)| CardPiles {
            deck,
            hand: Vec::new(),
            discard,
        })
}

/// RNG seed for the shuffle source.
pub fn seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}
