use std::sync::Arc;

use peloton::domain::cards::TeamColor;
use peloton::domain::player_view::RiderSummary;
use peloton::sync::{FileIdentityStore, IdentityStore, MemoryIdentityStore};
use peloton::{
    build_state, AppError, AppState, InMemoryStore, RecordStore, RuntimeConfig, Session,
};
use rand::Rng;
use tracing::info;
use uuid::Uuid;

mod telemetry;

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    // Configuration comes from PELOTON_* variables set by the caller.
    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    println!("🚴 Starting Peloton simulation ({} rounds)", config.sim_rounds);

    if let Err(e) = run(config).await {
        eprintln!("❌ Simulation failed: {e}");
        std::process::exit(1);
    }

    println!("✅ Simulation finished");
}

/// Two clients sharing one store: host creates, guest joins, then both play
/// `sim_rounds` rounds with random card picks.
async fn run(config: RuntimeConfig) -> Result<(), AppError> {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::new());

    let host_state = build_state()
        .with_store(Arc::clone(&store))
        .with_config(config.clone())
        .build()?;
    let mut guest_builder = build_state()
        .with_store(Arc::clone(&store))
        .with_config(config.clone());
    if let Some(seed) = config.shuffle_seed {
        guest_builder = guest_builder.with_seed(seed.wrapping_add(1));
    }
    let guest_state = guest_builder.build()?;

    let host_identity: Arc<dyn IdentityStore> = match &config.identity_file {
        Some(path) => Arc::new(FileIdentityStore::new(path)),
        None => Arc::new(MemoryIdentityStore::new()),
    };

    // Identifiers from an earlier process point into a store that no longer
    // exists; resume clears them and we start over.
    let mut host = match Session::resume(host_state.clone(), Arc::clone(&host_identity)).await? {
        Some(session) => session,
        None => Session::create(host_state.clone(), host_identity).await?,
    };
    let join_code = host
        .game()
        .map(|g| g.join_code.clone())
        .ok_or_else(|| AppError::internal("Host session has no game"))?;
    info!(join_code = %join_code, "Waiting for opponent");

    let mut guest = Session::join(
        guest_state.clone(),
        Arc::new(MemoryIdentityStore::new()),
        &join_code,
    )
    .await?;
    host.sync().await?;
    info!(view = ?host.view(), "Host view after join");

    host.select_teams(&[TeamColor::Red, TeamColor::Blue]).await?;
    host.sync().await?;
    guest.sync().await?;

    for _ in 0..config.sim_rounds {
        play_round(&mut host, &host_state).await?;
        play_round(&mut guest, &guest_state).await?;
        host.sync().await?;
        guest.sync().await?;

        for session in [&host, &guest] {
            info!(
                player_id = %session.player_id(),
                round = ?session.mirror().round(),
                moves = ?session.mirror().move_summary(session.player_id()),
                "Round summary"
            );
        }

        let game = host.advance_round().await?;
        info!(round = game.current_round, "Round advanced");
        host.sync().await?;
        guest.sync().await?;
    }

    for session in [&host, &guest] {
        let riders: Vec<RiderSummary> = session
            .own_riders()
            .into_iter()
            .map(RiderSummary::from)
            .collect();
        info!(player_id = %session.player_id(), ?riders, "Final riders");
    }

    host.disconnect();
    guest.disconnect();
    Ok(())
}

/// Draw for every owned rider, pick a random card for each, confirm.
async fn play_round(session: &mut Session, picker: &AppState) -> Result<(), AppError> {
    let rider_ids: Vec<Uuid> = session.own_riders().iter().map(|r| r.id).collect();
    for rider_id in rider_ids {
        session.draw_hand(rider_id).await?;
    }
    session.sync().await?;

    let mut draft = session.new_draft();
    for rider in session.own_riders() {
        let index = picker.with_rng(|rng| rng.random_range(0..rider.hand.len().max(1)));
        draft.select(rider, index)?;
    }
    let moves = session.confirm_moves(&draft).await?;
    info!(
        player_id = %session.player_id(),
        round = draft.round(),
        moves = moves.len(),
        "Moves confirmed"
    );
    Ok(())
}
