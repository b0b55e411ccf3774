//! Unit and language preferences.

use std::sync::Arc;
use tracing::warn;

use crate::{
    model::{Language, Units, UnitsUpdate},
    store::KeyValueStore,
};

pub const UNITS_KEY: &str = "weather-units";
pub const LANGUAGE_KEY: &str = "language";

#[derive(Debug)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    units: Units,
    language: Language,
}

impl Preferences {
    /// Read both preferences, falling back to defaults on any failure.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let units = match store.get(UNITS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding corrupt unit preferences");
                Units::default()
            }),
            Ok(None) => Units::default(),
            Err(e) => {
                warn!(error = %e, "failed to read unit preferences");
                Units::default()
            }
        };

        let language = match store.get(LANGUAGE_KEY) {
            Ok(Some(raw)) => Language::try_from(raw.as_str()).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unknown language preference");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                warn!(error = %e, "failed to read language preference");
                Language::default()
            }
        };

        Self { store, units, language }
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Merge a partial update over the current units and persist the result.
    pub fn set_units(&mut self, update: UnitsUpdate) -> Units {
        self.units = self.units.merged(update);

        let result = serde_json::to_string(&self.units)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(UNITS_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "failed to persist unit preferences");
        }

        self.units
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        if let Err(e) = self.store.set(LANGUAGE_KEY, language.as_str()) {
            warn!(error = %e, "failed to persist language preference");
        }
    }
}
