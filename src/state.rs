use crate::config::Config;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<Config>,
}

#[cfg(test)]
impl AppState {
    /// State over a fresh in-memory collection, for handler tests
    pub fn in_memory() -> (Self, Arc<crate::store::MemoryStore>) {
        let store = Arc::new(crate::store::MemoryStore::new());
        let config = Config::from_lookup(|key| match key {
            "STORE_BACKEND" => Some("memory".to_string()),
            _ => None,
        })
        .expect("memory config is always valid");

        let state = AppState {
            store: store.clone(),
            config: Arc::new(config),
        };
        (state, store)
    }
}
