//! Application context tying the catalog, state, config, and storage together.

use tracing::{debug, error, info};

use crate::catalog::Catalog;
use crate::config::{Config, CONFIG_KEY};
use crate::state::{StateMap, STATE_KEY};
use crate::stats::{compute_stats, Stats};
use crate::storage::KeyValueStore;

/// Owns everything a session mutates. Every mutation is written through to
/// the store before the method returns; storage failures are logged and never
/// reach the caller.
#[derive(Debug)]
pub struct Tracker<S: KeyValueStore> {
    catalog: Catalog,
    state: StateMap,
    config: Config,
    store: S,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Read state and config from `store`.
    pub fn load(catalog: Catalog, store: S) -> Self {
        let state = StateMap::load(&store);
        let config = Config::load(&store);
        info!(
            "Tracker ready: {} obtained ids, desaturate single = {}",
            state.len(),
            config.desaturate_on_single_count
        );
        Self {
            catalog,
            state,
            config,
            store,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &StateMap {
        &self.state
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn count(&self, id: &str) -> u32 {
        self.state.get(id)
    }

    /// Single-tap gesture: absent becomes 1, anything else becomes absent.
    pub fn toggle(&mut self, id: &str) -> u32 {
        let count = self.state.toggle(id);
        debug!("Toggled {id} -> {count}");
        self.persist_state();
        count
    }

    /// Store an explicit count; 0 removes the id.
    pub fn set_count(&mut self, id: &str, count: u32) -> u32 {
        self.state.set(id, count);
        debug!("Set {id} = {count}");
        self.persist_state();
        count
    }

    pub fn set_desaturate(&mut self, value: bool) {
        self.config.desaturate_on_single_count = value;
        self.persist_config();
    }

    pub fn stats(&self) -> Stats {
        compute_stats(&self.catalog, &self.state)
    }

    /// Write both keys. Called at shutdown; mutations already persist.
    pub fn save(&mut self) {
        self.persist_state();
        self.persist_config();
    }

    fn persist_state(&mut self) {
        if let Err(e) = self.store.set(STATE_KEY, self.state.encode()) {
            error!("Failed to save state: {e}");
        }
    }

    fn persist_config(&mut self) {
        if let Err(e) = self.store.set(CONFIG_KEY, self.config.encode()) {
            error!("Failed to save config: {e}");
        }
    }
}
