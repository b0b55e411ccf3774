//! Recently viewed locations, most recent first.

use std::sync::Arc;
use tracing::warn;

use crate::{model::Location, store::KeyValueStore};

pub const HISTORY_KEY: &str = "weather-history";
pub const MAX_HISTORY_ITEMS: usize = 10;

#[derive(Debug)]
pub struct History {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<Location>,
}

impl History {
    /// Read the persisted list. Missing, unreadable or corrupt data yields an empty history.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Location>>(&raw) {
                Ok(mut entries) => {
                    entries.truncate(MAX_HISTORY_ITEMS);
                    entries
                }
                Err(e) => {
                    warn!(error = %e, "discarding corrupt location history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read location history");
                Vec::new()
            }
        };

        Self { store, entries }
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `location` to the front, dropping any older copy and the overflow.
    pub fn add(&mut self, location: Location) {
        let key = location.history_key();
        self.entries.retain(|item| item.history_key() != key);
        self.entries.insert(0, location);
        self.entries.truncate(MAX_HISTORY_ITEMS);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            warn!(error = %e, "failed to delete persisted location history");
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(HISTORY_KEY, &json));

        if let Err(e) = result {
            warn!(error = %e, "failed to persist location history");
        }
    }
}
