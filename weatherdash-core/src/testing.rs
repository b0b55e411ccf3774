//! In-process gateway double shared by the controller and search tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    error::GatewayError,
    gateway::WeatherGateway,
    model::{
        AirQuality, CurrentConditions, ForecastEntry, ForecastSet, Language, Location,
        PollutantLevels, UnitSystem,
    },
};

#[derive(Debug, Default)]
pub(crate) struct FakeGateway {
    pub geocode_results: Vec<Location>,
    pub reverse_results: Vec<Location>,
    pub fail_geocode: Option<u16>,
    pub fail_reverse: Option<u16>,
    pub fail_air: Option<u16>,
    pub geocode_calls: AtomicUsize,
    pub current_calls: AtomicUsize,
    pub geocode_queries: Mutex<Vec<String>>,
    pub last_params: Mutex<Option<(UnitSystem, Language)>>,
}

impl FakeGateway {
    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<(UnitSystem, Language)> {
        *self.last_params.lock().unwrap()
    }
}

pub(crate) fn place(name: &str, lat: f64, lon: f64) -> Location {
    Location {
        name: name.to_string(),
        lat,
        lon,
        country: "XX".to_string(),
        state: None,
    }
}

/// Name used by the fake for conditions at a coordinate.
pub(crate) fn coords_name(lat: f64, lon: f64) -> String {
    format!("{lat}/{lon}")
}

fn check(fail: Option<u16>) -> Result<(), GatewayError> {
    match fail {
        Some(status) => Err(GatewayError::from_status(status)),
        None => Ok(()),
    }
}

#[async_trait]
impl WeatherGateway for FakeGateway {
    async fn geocode(&self, name: &str) -> Result<Vec<Location>, GatewayError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        self.geocode_queries.lock().unwrap().push(name.to_string());
        check(self.fail_geocode)?;
        Ok(self.geocode_results.clone())
    }

    async fn reverse_geocode(&self, _lat: f64, _lon: f64) -> Result<Vec<Location>, GatewayError> {
        check(self.fail_reverse)?;
        Ok(self.reverse_results.clone())
    }

    async fn current(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
        lang: Language,
    ) -> Result<CurrentConditions, GatewayError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = Some((units, lang));

        let now = Utc::now();
        Ok(CurrentConditions {
            location_name: coords_name(lat, lon),
            temperature: 20.0,
            feels_like: 19.0,
            humidity: 50,
            pressure: 1013.0,
            wind_speed: 3.0,
            wind_direction: 90,
            cloud_cover: 20,
            visibility: Some(10_000),
            sunrise: now,
            sunset: now,
            observed_at: now,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
        })
    }

    async fn forecast(
        &self,
        _lat: f64,
        _lon: f64,
        _units: UnitSystem,
        _lang: Language,
    ) -> Result<ForecastSet, GatewayError> {
        let start = Utc::now();
        let entries = (0..40)
            .map(|i| ForecastEntry {
                timestamp: start + Duration::hours(3 * i),
                temperature: i as f64,
                cloud_cover: 50,
                wind_speed: 2.0,
                wind_direction: 180,
                icon: "02d".to_string(),
                description: "few clouds".to_string(),
            })
            .collect();

        Ok(ForecastSet { city: "Fake".to_string(), country: "XX".to_string(), entries })
    }

    async fn air_quality(&self, _lat: f64, _lon: f64) -> Result<AirQuality, GatewayError> {
        check(self.fail_air)?;
        Ok(AirQuality {
            aqi: 2,
            components: PollutantLevels::default(),
            measured_at: Utc::now(),
        })
    }
}
