use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::runtime::RuntimeConfig;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::store::{InMemoryStore, RecordStore};

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: RuntimeConfig,
    store: Option<Arc<dyn RecordStore>>,
    seed: Option<u64>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            store: None,
            seed: None,
        }
    }

    /// Share an existing store, e.g. between two simulated clients.
    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Deterministic shuffles; overrides `PELOTON_SHUFFLE_SEED`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let rng = match self.seed.or(self.config.shuffle_seed) {
            Some(seed) => {
                debug!(seed, "Using seeded shuffle source");
                ChaCha8Rng::seed_from_u64(seed)
            }
            None => ChaCha8Rng::try_from_os_rng()
                .map_err(|e| AppError::internal(format!("OS randomness unavailable: {e}")))?,
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryStore::new()) as Arc<dyn RecordStore>);
        Ok(AppState::new(store, rng, self.config))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn build_succeeds_without_options() {
        let state = build_state().build().unwrap();
        assert_eq!(state.config(), &RuntimeConfig::default());
    }

    #[test]
    fn same_seed_same_shuffles() {
        let a = build_state().with_seed(11).build().unwrap();
        let b = build_state().with_seed(11).build().unwrap();
        let xs: u64 = a.with_rng(|r| r.random());
        let ys: u64 = b.with_rng(|r| r.random());
        assert_eq!(xs, ys);
    }

    #[test]
    fn explicit_seed_beats_config_seed() {
        let cfg = RuntimeConfig::default().with_seed(1);
        let a = build_state().with_config(cfg).with_seed(2).build().unwrap();
        let b = build_state().with_seed(2).build().unwrap();
        let xs: u32 = a.with_rng(|r| r.random());
        let ys: u32 = b.with_rng(|r| r.random());
        assert_eq!(xs, ys);
    }
}
