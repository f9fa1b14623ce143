//! Per-rider card supply: draw, choose, discard, reshuffle and fatigue.
//!
//! Every function here is pure apart from the caller-supplied RNG. Inputs are
//! borrowed and new piles are returned, so a failed store write never leaves
//! a half-mutated rider behind.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, RiderType};
use crate::errors::domain::{DomainError, ValidationKind};

/// Cards in a drawn hand.
pub const HAND_SIZE: usize = 4;

/// The three disjoint piles a rider owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPiles {
    /// Face-down; index 0 is drawn first.
    pub deck: Vec<Card>,
    /// Either empty or exactly `HAND_SIZE` cards.
    pub hand: Vec<Card>,
    pub discard: Vec<Card>,
}

impl CardPiles {
    /// Freshly shuffled starting deck with empty hand and discard.
    pub fn starting<R: Rng + ?Sized>(rider_type: RiderType, rng: &mut R) -> Self {
        let mut deck = rider_type.starting_deck();
        deck.shuffle(rng);
        Self {
            deck,
            hand: Vec::new(),
            discard: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len()
    }

    pub fn has_hand(&self) -> bool {
        !self.hand.is_empty()
    }

    /// All cards across piles, sorted. Handy for conservation checks.
    pub fn all_cards_sorted(&self) -> Vec<Card> {
        let mut all: Vec<Card> = self
            .deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .copied()
            .collect();
        all.sort();
        all
    }
}

/// Result of a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub piles: CardPiles,
    /// Discard was shuffled back under the deck.
    pub reshuffled: bool,
    /// Fatigue cards minted because deck and discard ran dry.
    pub fatigue_added: usize,
}

/// Draw a hand of `HAND_SIZE` cards.
///
/// Drawing while a hand is held is a caller bug and is rejected with
/// `HandNotEmpty`. When the deck holds fewer than `HAND_SIZE` cards the
/// discard is shuffled and appended; if that is still not enough, fatigue
/// cards are minted until exactly `HAND_SIZE` cards can be drawn.
pub fn draw<R: Rng + ?Sized>(piles: &CardPiles, rng: &mut R) -> Result<DrawOutcome, DomainError> {
    if piles.has_hand() {
        return Err(DomainError::validation(
            ValidationKind::HandNotEmpty,
            "Rider already holds a hand; choose a card before drawing again",
        ));
    }

    let mut deck = piles.deck.clone();
    let mut discard = piles.discard.clone();
    let mut reshuffled = false;
    let mut fatigue_added = 0;

    if deck.len() < HAND_SIZE {
        discard.shuffle(rng);
        deck.append(&mut discard);
        reshuffled = true;
    }

    while deck.len() < HAND_SIZE {
        deck.push(Card::FATIGUE);
        fatigue_added += 1;
    }

    let rest = deck.split_off(HAND_SIZE);
    Ok(DrawOutcome {
        piles: CardPiles {
            deck: rest,
            hand: deck,
            discard,
        },
        reshuffled,
        fatigue_added,
    })
}

/// Pick the card at `index`. Selection is positional so duplicate values stay
/// independently selectable.
pub fn choose_card(hand: &[Card], index: usize) -> Result<Card, DomainError> {
    if hand.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::NoHand,
            "Rider has no hand to choose from; draw first",
        ));
    }
    hand.get(index).copied().ok_or_else(|| {
        DomainError::validation(
            ValidationKind::CardIndexOutOfRange,
            format!("Card position {index} is outside a hand of {}", hand.len()),
        )
    })
}

/// Resolve the choice at `index`: the chosen card and every unchosen card go
/// to the discard (chosen first, then the rest in hand order) and the hand
/// empties. Returns the chosen card with the new piles.
pub fn resolve_choice(piles: &CardPiles, index: usize) -> Result<(Card, CardPiles), DomainError> {
    let chosen = choose_card(&piles.hand, index)?;

    let mut discard = piles.discard.clone();
    discard.push(chosen);
    discard.extend(
        piles
            .hand
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, c)| *c),
    );

    Ok((
        chosen,
        CardPiles {
            deck: piles.deck.clone(),
            hand: Vec::new(),
            discard,
        },
    ))
}

/// Voluntary penalty: one fatigue card straight onto the discard.
pub fn add_fatigue_card(piles: &CardPiles) -> CardPiles {
    let mut discard = piles.discard.clone();
    discard.push(Card::FATIGUE);
    CardPiles {
        deck: piles.deck.clone(),
        hand: piles.hand.clone(),
        discard,
    }
}
