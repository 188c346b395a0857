//! Collection state: item id to obtained count.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::storage::KeyValueStore;

/// Storage key holding the serialized [`StateMap`].
pub const STATE_KEY: &str = "shinydex_state";

/// Shapes the stored state has had over time.
#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedState {
    /// Oldest format: the list of obtained ids, each implying a count of 1.
    Legacy(Vec<String>),
    Counts(BTreeMap<String, i64>),
}

/// Obtained counts keyed by item id.
///
/// A key is present if and only if its count is at least 1; a count of zero
/// is always represented by the key being absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateMap {
    counts: BTreeMap<String, u32>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a stored value. Never fails: anything unrecognised yields an
    /// empty map.
    pub fn decode(text: &str) -> Self {
        match serde_json::from_str::<PersistedState>(text) {
            Ok(PersistedState::Legacy(ids)) => {
                debug!("Migrating legacy state list ({} ids)", ids.len());
                let counts = ids.into_iter().map(|id| (id, 1)).collect();
                Self { counts }
            }
            Ok(PersistedState::Counts(raw)) => {
                let counts = raw
                    .into_iter()
                    .filter(|&(_, count)| count > 0)
                    .map(|(id, count)| (id, u32::try_from(count).unwrap_or(u32::MAX)))
                    .collect();
                Self { counts }
            }
            Err(e) => {
                error!("Failed to load state: {e}");
                Self::default()
            }
        }
    }

    /// Read the state from `store`, falling back to an empty map.
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(STATE_KEY) {
            Some(text) => Self::decode(&text),
            None => {
                debug!("No stored state, starting empty");
                Self::default()
            }
        }
    }

    /// Serialize in the current (id to count) format.
    pub fn encode(&self) -> String {
        match serde_json::to_string(&self.counts) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize state: {e}");
                "{}".to_string()
            }
        }
    }

    /// Stored count for `id`, or 0.
    pub fn get(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Set the count for `id`; zero removes the key.
    pub fn set(&mut self, id: &str, count: u32) {
        if count == 0 {
            self.counts.remove(id);
        } else {
            self.counts.insert(id.to_string(), count);
        }
    }

    /// Flip between absent and a count of exactly 1. Returns the new count.
    pub fn toggle(&mut self, id: &str) -> u32 {
        let next = if self.get(id) > 0 { 0 } else { 1 };
        self.set(id, next);
        next
    }

    pub fn contains(&self, id: &str) -> bool {
        self.counts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of every stored count, including ids the catalog does not list.
    pub fn total_count(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }
}

/// Parse a manually entered count.
///
/// Takes the leading integer of the trimmed text (`"12abc"` is 12, `"3.7"`
/// is 3). Empty, non-numeric, and negative input all become 0.
pub fn parse_count(text: &str) -> u32 {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() || negative {
        return 0;
    }
    digits.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    })
}
