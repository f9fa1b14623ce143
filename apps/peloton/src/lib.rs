#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod infra;
pub mod repos;
pub mod services;
pub mod state;
pub mod store;
pub mod sync;
pub mod utils;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::runtime::RuntimeConfig;
pub use error::AppError;
pub use infra::state::build_state;
pub use services::game_flow::GameFlowService;
pub use services::lobby::LobbyService;
pub use services::roster::RosterService;
pub use state::app_state::AppState;
pub use store::{InMemoryStore, RecordStore};
pub use sync::Session;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
