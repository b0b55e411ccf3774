//! Display formatting for raw weather values.
//!
//! OpenWeather reports wind in m/s for `metric` and mph for `imperial`,
//! temperature in the requested system, and pressure always in hPa.

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{PressureUnit, UnitSystem, WindUnit};

const MS_TO_KMH: f64 = 3.6;
const MPH_TO_MS: f64 = 0.44704;
const HPA_TO_INHG: f64 = 0.029_529_983_071_4;

/// Round half up, so -0.5 becomes 0 rather than -1.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn format_temperature(temp: f64, units: UnitSystem) -> String {
    let symbol = match units {
        UnitSystem::Metric => "°C",
        UnitSystem::Imperial => "°F",
    };
    format!("{}{symbol}", round_half_up(temp))
}

/// Convert a raw wind speed (as delivered for `units`) into the preferred display unit.
pub fn format_wind_speed(speed: f64, units: UnitSystem, wind: WindUnit) -> String {
    let mps = match units {
        UnitSystem::Metric => speed,
        UnitSystem::Imperial => speed * MPH_TO_MS,
    };

    match wind {
        WindUnit::Kmh => format!("{} km/h", round_half_up(mps * MS_TO_KMH)),
        WindUnit::Mph => format!("{} mph", round_half_up(mps / MPH_TO_MS)),
    }
}

pub fn format_pressure(hpa: f64, unit: PressureUnit) -> String {
    match unit {
        PressureUnit::HPa => format!("{} hPa", round_half_up(hpa)),
        PressureUnit::InHg => format!("{:.2} inHg", hpa * HPA_TO_INHG),
    }
}

pub fn format_humidity(humidity: f64) -> String {
    format!("{}%", round_half_up(humidity))
}

pub fn format_visibility(meters: u32) -> String {
    format!("{:.1} km", f64::from(meters) / 1000.0)
}

/// `HH:MM` in the given zone.
pub fn format_clock<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%H:%M").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiLevel {
    pub level: u8,
    pub label: &'static str,
    pub description: &'static str,
}

/// Describe an AQI value; anything outside 1..=5 is reported as level 1.
pub fn aqi_level(aqi: u8) -> AqiLevel {
    let (level, label, description) = match aqi {
        2 => (2, "Fair", "Air quality is acceptable"),
        3 => (3, "Moderate", "Air quality is acceptable"),
        4 => (4, "Poor", "Air quality is poor"),
        5 => (5, "Very Poor", "Air quality is very poor"),
        _ => (1, "Good", "Air quality is satisfactory"),
    };
    AqiLevel { level, label, description }
}

pub fn cloud_glyph(cloud_cover: u8) -> &'static str {
    match cloud_cover {
        0..=24 => "☀️",
        25..=49 => "🌤️",
        50..=74 => "⛅",
        75..=89 => "☁️",
        _ => "🌫️",
    }
}

/// Arrow pointing where the wind comes from, in 45° steps (0° = north).
pub fn wind_arrow(degrees: u16) -> &'static str {
    const ARROWS: [&str; 8] = ["↑", "↗", "→", "↘", "↓", "↙", "←", "↖"];
    let idx = round_half_up(f64::from(degrees) / 45.0) as usize % ARROWS.len();
    ARROWS[idx]
}

/// Rough UV index from local hour and cloud cover; zero outside daylight.
pub fn uv_estimate(hour: u32, cloud_cover: u8) -> f64 {
    if !(6..=18).contains(&hour) {
        return 0.0;
    }
    (10.0 - f64::from(cloud_cover) / 10.0).clamp(0.0, 11.0)
}

pub fn uv_label(uv: f64) -> &'static str {
    match uv {
        u if u <= 2.0 => "Low",
        u if u <= 5.0 => "Moderate",
        u if u <= 7.0 => "High",
        u if u <= 10.0 => "Very High",
        _ => "Extreme",
    }
}
