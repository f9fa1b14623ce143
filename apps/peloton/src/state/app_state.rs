use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rand_chacha::ChaCha8Rng;

use crate::config::runtime::RuntimeConfig;
use crate::store::RecordStore;

/// Shared resources handed to every service and session.
#[derive(Clone)]
pub struct AppState {
    /// The shared record store both clients write to
    store: Arc<dyn RecordStore>,
    /// Shuffle source for decks and join codes
    rng: Arc<Mutex<ChaCha8Rng>>,
    config: RuntimeConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, rng: ChaCha8Rng, config: RuntimeConfig) -> Self {
        Self {
            store,
            rng: Arc::new(Mutex::new(rng)),
            config,
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn store_handle(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run `f` with exclusive access to the shuffle RNG.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        let mut rng = self.rng.lock();
        f(&mut rng)
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
