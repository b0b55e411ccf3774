use crate::{
    Config,
    error::GatewayError,
    gateway::openweather::OpenWeatherGateway,
    model::{AirQuality, CurrentConditions, ForecastSet, Language, Location, UnitSystem},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

const ICON_CDN: &str = "https://openweathermap.org/img/wn";

/// Remote weather data source.
///
/// Every call performs exactly one request: no retries and no caching.
#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    /// Resolve a place name into up to five candidate locations.
    async fn geocode(&self, name: &str) -> Result<Vec<Location>, GatewayError>;

    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Vec<Location>, GatewayError>;

    async fn current(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
        lang: Language,
    ) -> Result<CurrentConditions, GatewayError>;

    /// 5-day forecast in 3-hour steps.
    async fn forecast(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
        lang: Language,
    ) -> Result<ForecastSet, GatewayError>;

    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality, GatewayError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSize {
    #[default]
    X2,
    X4,
}

impl IconSize {
    fn suffix(&self) -> &'static str {
        match self {
            IconSize::X2 => "2x",
            IconSize::X4 => "4x",
        }
    }
}

/// CDN address of a weather condition icon, e.g. `10d@2x.png`.
pub fn icon_url(icon_code: &str, size: IconSize) -> String {
    format!("{ICON_CDN}/{icon_code}@{}.png", size.suffix())
}

/// Construct the OpenWeather gateway from config.
///
/// A missing key is not an error here: each call reports `NotConfigured` instead.
pub fn gateway_from_config(config: &Config) -> Arc<dyn WeatherGateway> {
    Arc::new(OpenWeatherGateway::with_base_url(config.api_key(), &config.base_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_urls_follow_cdn_pattern() {
        assert_eq!(
            icon_url("10d", IconSize::X2),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
        assert_eq!(
            icon_url("01n", IconSize::X4),
            "https://openweathermap.org/img/wn/01n@4x.png"
        );
    }

    #[tokio::test]
    async fn gateway_from_config_without_key_reports_not_configured() {
        let cfg = Config { api_key: None, ..Config::default() };
        // Only meaningful when the environment doesn't inject a key.
        if cfg.is_configured() {
            return;
        }

        let gateway = gateway_from_config(&cfg);
        let err = gateway.geocode("London").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
    }
}
