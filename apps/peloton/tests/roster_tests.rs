//! Integration tests for team selection and roster creation.

mod common;
mod support;

use std::collections::BTreeSet;

use peloton::domain::cards::{RiderType, TeamColor};
use peloton::domain::deck::HAND_SIZE;
use peloton::entities::GameState;
use peloton::error::AppError;
use peloton::errors::ErrorCode;
use peloton::repos::{games, riders};
use peloton::store::Table;
use peloton::{LobbyService, RosterService};
use support::game_setup::{active_game, seated_game, shared_store, state_on};

#[tokio::test]
async fn test_host_pick_gives_guest_remaining_colors() -> Result<(), AppError> {
    let (setup, roster) = active_game(101).await?;

    assert_eq!(roster.len(), 8);

    let host_colors: BTreeSet<_> = setup.host_riders(&roster).iter().map(|r| r.color).collect();
    let guest_colors: BTreeSet<_> = setup.guest_riders(&roster).iter().map(|r| r.color).collect();
    assert_eq!(host_colors, BTreeSet::from([TeamColor::Red, TeamColor::Blue]));
    assert_eq!(guest_colors, BTreeSet::from([TeamColor::Black, TeamColor::Green]));

    // One Sprinter and one Rouleur per color, four riders each.
    assert_eq!(setup.host_riders(&roster).len(), 4);
    assert_eq!(setup.guest_riders(&roster).len(), 4);
    for color in TeamColor::ALL {
        let types: BTreeSet<_> = roster
            .iter()
            .filter(|r| r.color == color)
            .map(|r| r.rider_type.as_str())
            .collect();
        assert_eq!(
            types,
            BTreeSet::from([RiderType::Rouleur.as_str(), RiderType::Sprinter.as_str()])
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_roster_activates_game_with_fresh_decks() -> Result<(), AppError> {
    let (setup, roster) = active_game(102).await?;
    let store = setup.host_state.store();

    let game = games::require(store, setup.game.id).await?;
    assert_eq!(game.state, GameState::Active);
    assert_eq!(game.current_round, 1);

    let stored = riders::list_for_game(store, setup.game.id).await?;
    assert_eq!(stored.len(), roster.len());
    for rider in &stored {
        assert_eq!(rider.deck.len(), 15, "{}", rider.label());
        assert!(rider.hand.is_empty());
        assert!(rider.discard.is_empty());

        let mut sorted = rider.deck.clone();
        sorted.sort();
        assert_eq!(sorted, rider.rider_type.starting_deck());
    }
    // Enough cards for several draws before any reshuffle.
    assert!(stored.iter().all(|r| r.deck.len() >= HAND_SIZE * 3));
    Ok(())
}

#[tokio::test]
async fn test_guest_cannot_select_teams() -> Result<(), AppError> {
    let setup = seated_game(103).await?;

    let err = RosterService::new()
        .create_roster(
            &setup.guest_state,
            setup.game.id,
            setup.guest.id,
            &[TeamColor::Red, TeamColor::Blue],
        )
        .await
        .expect_err("only the host selects teams");

    assert_eq!(err.code(), ErrorCode::InsufficientRole);
    assert_eq!(setup.store.count(Table::Riders), 0);
    Ok(())
}

#[tokio::test]
async fn test_selection_needs_both_players() -> Result<(), AppError> {
    let store = shared_store();
    let state = state_on(&store, 104);
    let seat = LobbyService::new().create_game(&state).await?;

    let err = RosterService::new()
        .create_roster(
            &state,
            seat.game.id,
            seat.player.id,
            &[TeamColor::Red, TeamColor::Blue],
        )
        .await
        .expect_err("guest has not joined");
    assert_eq!(err.code(), ErrorCode::NotEnoughPlayers);
    Ok(())
}

#[tokio::test]
async fn test_selection_must_be_two_distinct_colors() -> Result<(), AppError> {
    let setup = seated_game(105).await?;
    let service = RosterService::new();

    let picks: [&[TeamColor]; 4] = [
        &[],
        &[TeamColor::Red],
        &[TeamColor::Red, TeamColor::Red],
        &[TeamColor::Red, TeamColor::Blue, TeamColor::Green],
    ];
    for colors in picks {
        let err = service
            .create_roster(&setup.host_state, setup.game.id, setup.host.id, colors)
            .await
            .expect_err("invalid color pick");
        assert_eq!(err.code(), ErrorCode::InvalidColorSelection, "{colors:?}");
    }
    assert_eq!(setup.store.count(Table::Riders), 0);
    Ok(())
}

#[tokio::test]
async fn test_second_selection_is_rejected() -> Result<(), AppError> {
    let (setup, _) = active_game(106).await?;

    let err = RosterService::new()
        .create_roster(
            &setup.host_state,
            setup.game.id,
            setup.host.id,
            &[TeamColor::Black, TeamColor::Green],
        )
        .await
        .expect_err("teams are fixed once selected");
    assert_eq!(err.code(), ErrorCode::RosterExists);
    assert_eq!(setup.store.count(Table::Riders), 8);
    Ok(())
}

#[tokio::test]
async fn test_failed_roster_commit_leaves_game_in_setup() -> Result<(), AppError> {
    let setup = seated_game(107).await?;
    let service = RosterService::new();
    let colors = [TeamColor::Red, TeamColor::Blue];

    setup.store.inject_fault(Table::Riders);
    let err = service
        .create_roster(&setup.host_state, setup.game.id, setup.host.id, &colors)
        .await
        .expect_err("store fault");
    assert_eq!(err.code(), ErrorCode::StoreUnavailable);
    assert_eq!(setup.store.count(Table::Riders), 0);
    let game = games::require(setup.host_state.store(), setup.game.id).await?;
    assert_eq!(game.state, GameState::Setup);

    // The fault is one-shot; the host can simply retry.
    let roster = service
        .create_roster(&setup.host_state, setup.game.id, setup.host.id, &colors)
        .await?;
    assert_eq!(roster.len(), 8);
    Ok(())
}
