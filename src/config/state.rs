// Application state module
// Shared by every connection: configuration plus the storage service

use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Config;
use crate::storage::VocabStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: VocabStore,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = VocabStore::new(&config.storage);
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: VocabStore) -> Self {
        Self {
            config,
            store,
            active_connections: AtomicUsize::new(0),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::Relaxed)
    }
}
