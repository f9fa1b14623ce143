//! Property tests for the Move Ledger, Round Controller and roster split.
//!
//! Properties tested:
//! - A second move for the same (rider, round) is always rejected
//! - `moves_for_round` never lists a rider twice
//! - All-moved flips exactly at the 4th move of a 2x2 game
//! - Only the host can advance a resolved round
//! - Any valid color pick splits the four colors 2/2 without overlap

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::domain::cards::{Card, RiderType, TeamColor};
use crate::domain::deck::CardPiles;
use crate::domain::ledger::MoveLedger;
use crate::domain::roles::PlayerRole;
use crate::domain::roster::{plan_roster, split_colors};
use crate::domain::round::{derive_phase, plan_advance, RoundPhase};
use crate::domain::test_gens;
use crate::domain::test_prelude;
use crate::entities::{Game, GameState, Move, Player, Rider};

fn two_by_two(host_colors: [TeamColor; 2]) -> (Game, Vec<Player>, Vec<Rider>) {
    let mut game = Game::new("K7P9Q2");
    game.state = GameState::Active;
    let host = Player::new(game.id, PlayerRole::Host);
    let guest = Player::new(game.id, PlayerRole::Guest);
    let mut riders = Vec::new();
    for (player, color) in [(&host, host_colors[0]), (&guest, host_colors[1])] {
        for rider_type in RiderType::ALL {
            riders.push(Rider::new(
                game.id,
                player.id,
                rider_type,
                color,
                CardPiles::default(),
            ));
        }
    }
    (game, vec![host, guest], riders)
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: recording in any order, duplicates always fail and never show up
    #[test]
    fn prop_ledger_rejects_duplicates(
        attempts in prop::collection::vec((0usize..4, 1u32..4, test_gens::card()), 1..40),
    ) {
        let game_id = Uuid::new_v4();
        let player_id = Uuid::new_v4();
        let rider_ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let mut ledger = MoveLedger::new();
        let mut seen = HashSet::new();

        for (rider, round, card) in attempts {
            let mv = Move::new(game_id, player_id, rider_ids[rider], card, round);
            let fresh = seen.insert((rider, round));
            prop_assert_eq!(ledger.record(mv).is_ok(), fresh);
        }

        for round in 1..4 {
            let listed: Vec<Uuid> = ledger
                .moves_for_round(round)
                .values()
                .flatten()
                .map(|m| m.rider_id)
                .collect();
            let unique: HashSet<_> = listed.iter().copied().collect();
            prop_assert_eq!(listed.len(), unique.len());
        }
    }

    /// Property: AllMoved only once every rider of both players has a move
    #[test]
    fn prop_all_moved_gating(order in Just(vec![0usize, 1, 2, 3]).prop_shuffle()) {
        let (game, players, riders) = two_by_two([TeamColor::Red, TeamColor::Blue]);
        let mut ledger = MoveLedger::new();

        for (count, idx) in order.iter().enumerate() {
            prop_assert_eq!(
                derive_phase(&game, &players, &riders, &ledger),
                RoundPhase::Selecting { round: 1 },
                "after {} moves", count
            );
            let r = &riders[*idx];
            ledger.record(Move::new(game.id, r.player_id, r.id, Card::new(5), 1)).unwrap();
        }
        prop_assert_eq!(
            derive_phase(&game, &players, &riders, &ledger),
            RoundPhase::AllMoved { round: 1 }
        );
        prop_assert!(!ledger.all_players_moved(1, &players[..1], &riders));
    }

    /// Property: whoever acts, only the host advances, and only by one
    #[test]
    fn prop_only_host_advances(round in 1u32..50, actor_is_host in any::<bool>()) {
        let (mut game, players, _) = two_by_two([TeamColor::Green, TeamColor::Black]);
        game.current_round = round;
        let actor = if actor_is_host { &players[0] } else { &players[1] };

        let result = plan_advance(&game, actor, RoundPhase::AllMoved { round });
        if actor_is_host {
            prop_assert_eq!(result.ok(), Some(round + 1));
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// Property: roster split gives every color one owner and each player four riders
    #[test]
    fn prop_roster_split(
        a in test_gens::team_color(),
        b in test_gens::team_color(),
        seed in test_gens::seed(),
    ) {
        let split = split_colors(&[a, b]);
        if a == b {
            prop_assert!(split.is_err());
            return Ok(());
        }
        let split = split.unwrap();
        let game_id = Uuid::new_v4();
        let host = Player::new(game_id, PlayerRole::Host);
        let guest = Player::new(game_id, PlayerRole::Guest);
        let riders = plan_roster(game_id, &host, &guest, &split, &mut ChaCha8Rng::seed_from_u64(seed));

        let host_colors: HashSet<_> = split.host.iter().copied().collect();
        let guest_colors: HashSet<_> = split.guest.iter().copied().collect();
        prop_assert!(host_colors.is_disjoint(&guest_colors));
        prop_assert_eq!(host_colors.len() + guest_colors.len(), 4);

        let pairs: HashSet<_> = riders.iter().map(|r| (r.color, r.rider_type)).collect();
        prop_assert_eq!(pairs.len(), 8);
        for rider in &riders {
            let expected_owner = if host_colors.contains(&rider.color) { host.id } else { guest.id };
            prop_assert_eq!(rider.player_id, expected_owner);
        }
    }
}
