//! Property tests for the Deck Engine (pure, no store).
//!
//! Properties tested:
//! - Draw/resolve cycles conserve the starting 15 cards
//! - Drawing with at least 4 deck cards takes exactly 4 off the deck
//! - Drawing with fewer than 4 cards overall mints exactly the shortfall as fatigue
//! - Resolving empties the hand and grows the discard by the hand size

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::cards::Card;
use crate::domain::deck::{draw, resolve_choice, CardPiles, HAND_SIZE};
use crate::domain::test_gens;
use crate::domain::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: total card count never changes while no fatigue is minted
    #[test]
    fn prop_cycles_conserve_cards(
        rider_type in test_gens::rider_type(),
        seed in test_gens::seed(),
        picks in prop::collection::vec(0usize..HAND_SIZE, 1..30),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut piles = CardPiles::starting(rider_type, &mut rng);
        let expected = rider_type.starting_deck();

        for pick in picks {
            let drawn = draw(&piles, &mut rng).unwrap();
            prop_assert_eq!(drawn.fatigue_added, 0);
            prop_assert_eq!(drawn.piles.total(), 15);

            let (_, resolved) = resolve_choice(&drawn.piles, pick).unwrap();
            prop_assert_eq!(resolved.total(), 15);
            prop_assert_eq!(resolved.all_cards_sorted(), expected.clone());
            piles = resolved;
        }
    }

    /// Property: a full deck yields a 4-card hand and shrinks by exactly 4
    #[test]
    fn prop_draw_from_full_deck(
        piles in test_gens::drawable_piles(20),
        seed in test_gens::seed(),
    ) {
        prop_assume!(piles.deck.len() >= HAND_SIZE);
        let out = draw(&piles, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();

        prop_assert_eq!(out.piles.hand.len(), HAND_SIZE);
        prop_assert_eq!(out.piles.deck.len(), piles.deck.len() - HAND_SIZE);
        prop_assert_eq!(&out.piles.hand[..], &piles.deck[..HAND_SIZE]);
        prop_assert_eq!(&out.piles.discard, &piles.discard);
        prop_assert!(!out.reshuffled);
    }

    /// Property: the fatigue shortfall is exactly 4 - (deck + discard)
    #[test]
    fn prop_draw_mints_exact_shortfall(
        piles in test_gens::drawable_piles(3),
        seed in test_gens::seed(),
    ) {
        let available = piles.deck.len() + piles.discard.len();
        let out = draw(&piles, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();

        prop_assert_eq!(out.piles.hand.len(), HAND_SIZE);
        if available < HAND_SIZE {
            prop_assert_eq!(out.fatigue_added, HAND_SIZE - available);
            prop_assert_eq!(out.piles.total(), HAND_SIZE);
            let fatigue = out.piles.hand.iter().filter(|c| **c == Card::FATIGUE).count();
            prop_assert!(fatigue >= out.fatigue_added);
        } else {
            prop_assert_eq!(out.fatigue_added, 0);
            prop_assert_eq!(out.piles.total(), available);
        }
    }

    /// Property: resolve leaves no hand and moves all of it to the discard
    #[test]
    fn prop_resolve_moves_whole_hand(
        piles in test_gens::drawable_piles(12),
        seed in test_gens::seed(),
        pick in 0usize..HAND_SIZE,
    ) {
        let drawn = draw(&piles, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap().piles;
        let (chosen, after) = resolve_choice(&drawn, pick).unwrap();

        prop_assert!(after.hand.is_empty());
        prop_assert_eq!(after.discard.len(), drawn.discard.len() + HAND_SIZE);
        prop_assert_eq!(chosen, drawn.hand[pick]);
        prop_assert_eq!(after.discard[drawn.discard.len()], chosen);
        prop_assert_eq!(&after.deck, &drawn.deck);
    }
}
