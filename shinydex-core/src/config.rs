use tracing::debug;

use crate::storage::KeyValueStore;

/// Storage key for the single-count desaturation preference.
pub const CONFIG_KEY: &str = "shinydex_config_grayscale";

/// User display preference persisted alongside the collection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Render tiles whose count is exactly 1 desaturated.
    pub desaturate_on_single_count: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            desaturate_on_single_count: true,
        }
    }
}

impl Config {
    /// Read the flag from `store`. Absent means `true`; any stored text other
    /// than `"true"` means `false`.
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(CONFIG_KEY) {
            Some(text) => Self {
                desaturate_on_single_count: text == "true",
            },
            None => {
                debug!("No stored config, using defaults");
                Self::default()
            }
        }
    }

    pub fn encode(&self) -> String {
        self.desaturate_on_single_count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_to_true_when_absent() {
        let store = MemoryStore::new();
        assert!(Config::load(&store).desaturate_on_single_count);
    }

    #[test]
    fn reads_textual_boolean() {
        let mut store = MemoryStore::new();
        store.set(CONFIG_KEY, "false".into()).unwrap();
        assert!(!Config::load(&store).desaturate_on_single_count);
        store.set(CONFIG_KEY, "true".into()).unwrap();
        assert!(Config::load(&store).desaturate_on_single_count);
        store.set(CONFIG_KEY, "yes".into()).unwrap();
        assert!(!Config::load(&store).desaturate_on_single_count);
    }
}
