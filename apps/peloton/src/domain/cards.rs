//! Card values, rider types and team colors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A movement card. Only the value matters; duplicates are distinguished by
/// their position in a pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(u8);

impl Card {
    /// Value of a fatigue card.
    pub const FATIGUE: Card = Card(2);

    pub const fn new(value: u8) -> Self {
        Card(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for Card {
    fn from(value: u8) -> Self {
        Card(value)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Copies of each value in a starting deck.
const COPIES_PER_VALUE: usize = 3;

const SPRINTER_VALUES: [u8; 5] = [2, 3, 4, 5, 9];
const ROULEUR_VALUES: [u8; 5] = [3, 4, 5, 6, 7];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiderType {
    Sprinter,
    Rouleur,
}

impl RiderType {
    pub const ALL: [RiderType; 2] = [RiderType::Sprinter, RiderType::Rouleur];

    /// Unshuffled starting deck, sorted by value.
    pub fn starting_deck(self) -> Vec<Card> {
        let values = match self {
            RiderType::Sprinter => SPRINTER_VALUES,
            RiderType::Rouleur => ROULEUR_VALUES,
        };
        values
            .iter()
            .flat_map(|&v| std::iter::repeat(Card(v)).take(COPIES_PER_VALUE))
            .collect()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RiderType::Sprinter => "Sprinter",
            RiderType::Rouleur => "Rouleur",
        }
    }
}

impl fmt::Display for RiderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamColor {
    Red,
    Black,
    Green,
    Blue,
}

impl TeamColor {
    pub const ALL: [TeamColor; 4] = [
        TeamColor::Red,
        TeamColor::Black,
        TeamColor::Green,
        TeamColor::Blue,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TeamColor::Red => "Red",
            TeamColor::Black => "Black",
            TeamColor::Green => "Green",
            TeamColor::Blue => "Blue",
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
