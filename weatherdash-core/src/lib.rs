//! Core library for the `weatherdash` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather gateway and its error model
//! - Forecast aggregation and unit/locale formatting
//! - Search history and preferences persistence
//! - The dashboard controller that ties them together
//!
//! It is used by `weatherdash-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod archive;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod format;
pub mod gateway;
pub mod history;
pub mod i18n;
pub mod model;
pub mod position;
pub mod prefs;
pub mod search;
pub mod store;
pub mod validation;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use controller::{Dashboard, DashboardController, DashboardState};
pub use error::GatewayError;
pub use gateway::{WeatherGateway, gateway_from_config};
pub use model::{Language, Location, UnitSystem, Units, UnitsUpdate};
pub use store::{FileStore, KeyValueStore};
