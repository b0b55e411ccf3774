//! Dashboard state machine.
//!
//! `Idle -> Locating -> Fetching -> Ready`, with `Offline` and `Error`
//! reachable from anywhere. Each fetch carries a request token; a result
//! whose token is no longer the latest is dropped, so the most recent
//! selection always wins.

use chrono::Local;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    aggregate::{build_daily_summaries, build_hourly_slots},
    error::GatewayError,
    gateway::WeatherGateway,
    history::History,
    model::{
        AirQuality, CurrentConditions, DailySummary, ForecastSet, HourlySlot, Language, Location,
        UnitSystem, Units, UnitsUpdate,
    },
    position::PositionSource,
    prefs::Preferences,
    store::KeyValueStore,
};

/// Everything the ready dashboard shows for one location.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: ForecastSet,
    pub air_quality: AirQuality,
    pub daily: Vec<DailySummary>,
    pub hourly: Vec<HourlySlot>,
    pub units: UnitSystem,
    pub language: Language,
}

#[derive(Debug, Clone)]
pub enum DashboardState {
    Idle,
    Locating,
    Fetching { location: Location },
    Ready(Box<Dashboard>),
    Offline,
    Error(String),
}

impl DashboardState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DashboardState::Ready(_))
    }
}

/// Parameters of one in-flight fetch.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    token: u64,
    pub location: Location,
    pub units: UnitSystem,
    pub language: Language,
}

#[derive(Debug)]
pub struct FetchOutcome {
    ticket: FetchTicket,
    result: Result<(CurrentConditions, ForecastSet, AirQuality), GatewayError>,
}

/// Issue the three dashboard calls concurrently. Any failure fails the whole fetch.
pub async fn fetch_dashboard(gateway: &dyn WeatherGateway, ticket: FetchTicket) -> FetchOutcome {
    let FetchTicket { location, units, language, .. } = &ticket;

    let result = tokio::try_join!(
        gateway.current(location.lat, location.lon, *units, *language),
        gateway.forecast(location.lat, location.lon, *units, *language),
        gateway.air_quality(location.lat, location.lon),
    );

    FetchOutcome { ticket, result }
}

#[derive(Debug)]
pub struct DashboardController {
    gateway: Arc<dyn WeatherGateway>,
    positions: Arc<dyn PositionSource>,
    history: History,
    prefs: Preferences,
    state: DashboardState,
    selected: Option<Location>,
    online: bool,
    latest_token: u64,
}

impl DashboardController {
    pub fn new(
        gateway: Arc<dyn WeatherGateway>,
        positions: Arc<dyn PositionSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            gateway,
            positions,
            history: History::load(store.clone()),
            prefs: Preferences::load(store),
            state: DashboardState::Idle,
            selected: None,
            online: true,
            latest_token: 0,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn units(&self) -> Units {
        self.prefs.units()
    }

    pub fn language(&self) -> Language {
        self.prefs.language()
    }

    pub fn selected_location(&self) -> Option<&Location> {
        self.selected.as_ref()
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    fn transition(&mut self, next: DashboardState) {
        debug!(from = state_name(&self.state), to = state_name(&next), "dashboard transition");
        self.state = next;
    }

    /// Connectivity changes. Going offline invalidates any in-flight fetch;
    /// coming back does not retry anything.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
        if online {
            if matches!(self.state, DashboardState::Offline) {
                self.transition(DashboardState::Idle);
            }
        } else {
            self.latest_token += 1;
            self.transition(DashboardState::Offline);
        }
    }

    /// Locate the device and load its weather.
    pub async fn start(&mut self) {
        if !self.online {
            self.transition(DashboardState::Offline);
            return;
        }

        self.transition(DashboardState::Locating);

        let position = match self.positions.current_position().await {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "device position unavailable");
                self.transition(DashboardState::Error(e.to_string()));
                return;
            }
        };

        let resolved = self
            .gateway
            .reverse_geocode(position.latitude, position.longitude)
            .await
            .and_then(|found| found.into_iter().next().ok_or(GatewayError::NotFound));

        match resolved {
            Ok(location) => self.select_location(location).await,
            Err(e) => {
                warn!(error = %e, "reverse geocoding failed");
                let message = format!("Failed to get current location: {}", e.user_message());
                self.transition(DashboardState::Error(message));
            }
        }
    }

    /// Same as [`start`](Self::start); triggered by the "current location" action.
    pub async fn use_current_location(&mut self) {
        self.start().await;
    }

    /// Select a location, record it in history and load its weather.
    pub async fn select_location(&mut self, location: Location) {
        self.history.add(location.clone());
        if let Some(ticket) = self.begin_fetch(location) {
            let outcome = fetch_dashboard(self.gateway.as_ref(), ticket).await;
            self.complete(outcome);
        }
    }

    /// Reload the selected location, e.g. after connectivity returns.
    pub async fn refresh(&mut self) {
        let Some(location) = self.selected.clone() else {
            return;
        };

        if let Some(ticket) = self.begin_fetch(location) {
            let outcome = fetch_dashboard(self.gateway.as_ref(), ticket).await;
            self.complete(outcome);
        }
    }

    /// Enter `Fetching` for `location` and hand out the ticket for it.
    /// Any earlier ticket becomes stale. Returns `None` while offline.
    pub fn begin_fetch(&mut self, location: Location) -> Option<FetchTicket> {
        if !self.online {
            self.transition(DashboardState::Offline);
            return None;
        }

        self.latest_token += 1;
        self.selected = Some(location.clone());
        self.transition(DashboardState::Fetching { location: location.clone() });

        Some(FetchTicket {
            token: self.latest_token,
            location,
            units: self.prefs.units().temperature,
            language: self.prefs.language(),
        })
    }

    /// Apply a finished fetch. Returns `false` when the outcome was stale and ignored.
    pub fn complete(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome { ticket, result } = outcome;

        if ticket.token != self.latest_token {
            debug!(
                token = ticket.token,
                latest = self.latest_token,
                location = %ticket.location.name,
                "discarding stale weather response"
            );
            return false;
        }

        match result {
            Ok((current, forecast, air_quality)) => {
                info!(location = %ticket.location.name, "weather loaded");
                let daily = build_daily_summaries(&forecast, &Local, ticket.language);
                let hourly = build_hourly_slots(&forecast, &Local::now());

                self.transition(DashboardState::Ready(Box::new(Dashboard {
                    location: ticket.location,
                    current,
                    forecast,
                    air_quality,
                    daily,
                    hourly,
                    units: ticket.units,
                    language: ticket.language,
                })));
            }
            Err(e) => {
                warn!(error = %e, location = %ticket.location.name, "weather fetch failed");
                self.transition(DashboardState::Error(e.user_message()));
            }
        }

        true
    }

    /// Change the temperature system; a ready dashboard is reloaded with it.
    pub async fn set_units(&mut self, update: UnitsUpdate) {
        let before = self.prefs.units().temperature;
        let after = self.prefs.set_units(update).temperature;

        if before != after && self.state.is_ready() {
            self.refresh().await;
        }
    }

    /// Change the language; a ready dashboard is reloaded with it.
    pub async fn set_language(&mut self, language: Language) {
        let before = self.prefs.language();
        self.prefs.set_language(language);

        if before != language && self.state.is_ready() {
            self.refresh().await;
        }
    }
}

fn state_name(state: &DashboardState) -> &'static str {
    match state {
        DashboardState::Idle => "idle",
        DashboardState::Locating => "locating",
        DashboardState::Fetching { .. } => "fetching",
        DashboardState::Ready(_) => "ready",
        DashboardState::Offline => "offline",
        DashboardState::Error(_) => "error",
    }
}
