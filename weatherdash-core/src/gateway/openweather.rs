use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    config::DEFAULT_BASE_URL,
    error::GatewayError,
    model::{
        AirQuality, CurrentConditions, ForecastEntry, ForecastSet, Language, Location,
        PollutantLevels, UnitSystem,
    },
};

use super::WeatherGateway;

const GEOCODE_LIMIT: &str = "5";

#[derive(Debug, Clone)]
pub struct OpenWeatherGateway {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherGateway {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::NotConfigured)?;
        let url = format!("{}{}", self.base_url, path);

        debug!(endpoint = path, "sending OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", api_key)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(
                endpoint = path,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "OpenWeather request failed"
            );
            return Err(GatewayError::from_status(status.as_u16()));
        }

        serde_json::from_str(&body)
            .map_err(|e| GatewayError::Parse(format!("{path}: {e}")))
    }
}

fn coords(lat: f64, lon: f64) -> [(&'static str, String); 2] {
    [("lat", lat.to_string()), ("lon", lon.to_string())]
}

#[async_trait]
impl WeatherGateway for OpenWeatherGateway {
    #[instrument(skip(self), level = "debug")]
    async fn geocode(&self, name: &str) -> Result<Vec<Location>, GatewayError> {
        self.get_json(
            "/geo/1.0/direct",
            &[("q", name.to_string()), ("limit", GEOCODE_LIMIT.to_string())],
        )
        .await
    }

    #[instrument(skip(self), level = "debug")]
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Vec<Location>, GatewayError> {
        let [lat, lon] = coords(lat, lon);
        self.get_json("/geo/1.0/reverse", &[lat, lon, ("limit", "1".to_string())])
            .await
    }

    #[instrument(skip(self), level = "debug")]
    async fn current(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
        lang: Language,
    ) -> Result<CurrentConditions, GatewayError> {
        let [lat, lon] = coords(lat, lon);
        let parsed: OwCurrentResponse = self
            .get_json(
                "/data/2.5/weather",
                &[
                    lat,
                    lon,
                    ("units", units.as_str().to_string()),
                    ("lang", lang.as_str().to_string()),
                ],
            )
            .await?;

        Ok(parsed.into_conditions())
    }

    #[instrument(skip(self), level = "debug")]
    async fn forecast(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
        lang: Language,
    ) -> Result<ForecastSet, GatewayError> {
        let [lat, lon] = coords(lat, lon);
        let parsed: OwForecastResponse = self
            .get_json(
                "/data/2.5/forecast",
                &[
                    lat,
                    lon,
                    ("units", units.as_str().to_string()),
                    ("lang", lang.as_str().to_string()),
                ],
            )
            .await?;

        Ok(ForecastSet {
            city: parsed.city.name,
            country: parsed.city.country,
            entries: parsed.list.into_iter().map(OwForecastEntry::into_entry).collect(),
        })
    }

    #[instrument(skip(self), level = "debug")]
    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality, GatewayError> {
        let [lat, lon] = coords(lat, lon);
        let parsed: OwAirResponse = self.get_json("/data/2.5/air_pollution", &[lat, lon]).await?;

        let sample = parsed
            .list
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Parse("air_pollution response contained no data".into()))?;

        Ok(AirQuality {
            aqi: sample.main.aqi,
            components: sample.components,
            measured_at: unix_to_utc(sample.dt).unwrap_or_else(Utc::now),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    humidity: u8,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    #[serde(default)]
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    visibility: Option<u32>,
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_conditions(self) -> CurrentConditions {
        let (description, icon) = describe(self.weather);
        let now = Utc::now();

        CurrentConditions {
            location_name: self.name,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            wind_direction: self.wind.deg,
            cloud_cover: self.clouds.all,
            visibility: self.visibility,
            sunrise: unix_to_utc(self.sys.sunrise).unwrap_or(now),
            sunset: unix_to_utc(self.sys.sunset).unwrap_or(now),
            observed_at: unix_to_utc(self.dt).unwrap_or(now),
            description,
            icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
}

impl OwForecastEntry {
    fn into_entry(self) -> ForecastEntry {
        let (description, icon) = describe(self.weather);

        ForecastEntry {
            timestamp: unix_to_utc(self.dt).unwrap_or_else(Utc::now),
            temperature: self.main.temp,
            cloud_cover: self.clouds.all,
            wind_speed: self.wind.speed,
            wind_direction: self.wind.deg,
            icon,
            description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwAirSample {
    main: OwAqi,
    #[serde(default)]
    components: PollutantLevels,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    list: Vec<OwAirSample>,
}

/// Description and icon of the primary condition, with clear-sky fallbacks.
fn describe(weather: Vec<OwWeather>) -> (String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| ("Clear".to_string(), "01d".to_string()))
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway(server: &MockServer) -> OpenWeatherGateway {
        OpenWeatherGateway::with_base_url(Some("test_key".into()), &server.uri())
    }

    #[tokio::test]
    async fn geocode_sends_query_limit_and_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "London"))
            .and(query_param("limit", "5"))
            .and(query_param("appid", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "London", "lat": 51.5073, "lon": -0.1276, "country": "GB", "state": "England"},
                {"name": "London", "lat": 42.98, "lon": -81.24, "country": "CA", "state": "Ontario"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let locations = gateway(&server).await.geocode("London").await.unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[1].country, "CA");
        assert_eq!(locations[0].state.as_deref(), Some("England"));
    }

    #[tokio::test]
    async fn current_maps_wire_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("units", "imperial"))
            .and(query_param("lang", "ru"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Moscow",
                "dt": 1_700_000_000,
                "main": {"temp": 30.2, "feels_like": 25.0, "humidity": 81, "pressure": 1012},
                "weather": [{"id": 500, "main": "Rain", "description": "небольшой дождь", "icon": "10d"}],
                "wind": {"speed": 4.5, "deg": 270},
                "clouds": {"all": 90},
                "visibility": 8000,
                "sys": {"sunrise": 1_699_990_000, "sunset": 1_700_020_000}
            })))
            .mount(&server)
            .await;

        let current = gateway(&server)
            .await
            .current(55.75, 37.61, UnitSystem::Imperial, Language::Ru)
            .await
            .unwrap();

        assert_eq!(current.location_name, "Moscow");
        assert_eq!(current.humidity, 81);
        assert_eq!(current.pressure, 1012.0);
        assert_eq!(current.wind_direction, 270);
        assert_eq!(current.cloud_cover, 90);
        assert_eq!(current.icon, "10d");
        assert_eq!(current.visibility, Some(8000));
        assert_eq!(current.observed_at.timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn forecast_maps_entries_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "city": {"name": "Paris", "country": "FR"},
                "list": [
                    {"dt": 1_700_000_000, "main": {"temp": 10.0}, "weather": [{"description": "clear sky", "icon": "01d"}],
                     "clouds": {"all": 0}, "wind": {"speed": 1.0, "deg": 10}},
                    {"dt": 1_700_010_800, "main": {"temp": 12.5}, "weather": [],
                     "clouds": {"all": 40}, "wind": {"speed": 2.0, "deg": 20}}
                ]
            })))
            .mount(&server)
            .await;

        let set = gateway(&server)
            .await
            .forecast(48.85, 2.35, UnitSystem::Metric, Language::En)
            .await
            .unwrap();

        assert_eq!(set.city, "Paris");
        assert_eq!(set.entries.len(), 2);
        assert_eq!(set.entries[1].temperature, 12.5);
        assert_eq!(set.entries[1].icon, "01d");
        assert!(set.entries[0].timestamp < set.entries[1].timestamp);
    }

    #[tokio::test]
    async fn air_quality_takes_first_sample() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "coord": {"lon": 2.35, "lat": 48.85},
                "list": [{"main": {"aqi": 3}, "components": {"co": 201.9, "no": 0.0, "no2": 0.77,
                    "o3": 68.66, "so2": 0.64, "pm2_5": 0.5, "pm10": 0.54, "nh3": 0.12}, "dt": 1_700_000_000}]
            })))
            .mount(&server)
            .await;

        let air = gateway(&server).await.air_quality(48.85, 2.35).await.unwrap();
        assert_eq!(air.aqi, 3);
        assert_eq!(air.components.o3, 68.66);
    }

    #[tokio::test]
    async fn empty_air_quality_list_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": []})))
            .mount(&server)
            .await;

        let err = gateway(&server).await.air_quality(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));
    }

    #[tokio::test]
    async fn status_codes_become_typed_errors() {
        let server = MockServer::start().await;

        for (status, p) in [(401, "/geo/1.0/direct"), (404, "/geo/1.0/reverse"), (429, "/data/2.5/air_pollution")] {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;
        }

        let gw = gateway(&server).await;
        assert!(matches!(gw.geocode("x").await.unwrap_err(), GatewayError::Unauthorized));
        assert!(matches!(gw.reverse_geocode(1.0, 2.0).await.unwrap_err(), GatewayError::NotFound));
        assert!(matches!(gw.air_quality(1.0, 2.0).await.unwrap_err(), GatewayError::RateLimited));
    }

    #[tokio::test]
    async fn server_error_keeps_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .await
            .current(0.0, 0.0, UnitSystem::Metric, Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(502)));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gw = OpenWeatherGateway::with_base_url(None, &server.uri());
        let err = gw.geocode("London").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = gateway(&server).await.geocode("x").await.unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "ж".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
