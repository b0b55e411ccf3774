//! Plain-text rendering of dashboard data.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use std::fmt::Write;

use weatherdash_core::{
    Dashboard, Language, Location, Units,
    format::{
        aqi_level, cloud_glyph, format_clock, format_humidity, format_pressure, format_temperature,
        format_visibility, format_wind_speed, uv_estimate, uv_label, wind_arrow,
    },
    i18n::translate,
};

/// Render a ready dashboard for `tz`, using `now` for the UV estimate.
pub fn dashboard<Tz: TimeZone>(d: &Dashboard, prefs: Units, tz: &Tz, now: DateTime<Utc>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let lang = d.language;
    let t = |key: &'static str| translate(lang, key);
    let temp = |v| format_temperature(v, d.units);
    let c = &d.current;

    let mut out = String::new();
    let _ = writeln!(out, "{}", d.location.display_name());
    let _ = writeln!(
        out,
        "{} {}  {}",
        cloud_glyph(c.cloud_cover),
        temp(c.temperature),
        c.description
    );
    let _ = writeln!(out, "  {}: {}", t("weather.feelsLike"), temp(c.feels_like));
    let _ = writeln!(out, "  {}: {}", t("weather.humidity"), format_humidity(f64::from(c.humidity)));
    let _ = writeln!(
        out,
        "  {}: {} {}",
        t("weather.wind"),
        format_wind_speed(c.wind_speed, d.units, prefs.wind),
        wind_arrow(c.wind_direction)
    );
    let _ = writeln!(out, "  {}: {}", t("weather.pressure"), format_pressure(c.pressure, prefs.pressure));
    if let Some(meters) = c.visibility {
        let _ = writeln!(out, "  {}: {}", t("weather.visibility"), format_visibility(meters));
    }
    let _ = writeln!(out, "  {}: {}", t("weather.sunrise"), format_clock(c.sunrise, tz));
    let _ = writeln!(out, "  {}: {}", t("weather.sunset"), format_clock(c.sunset, tz));

    let uv = uv_estimate(now.with_timezone(tz).hour(), c.cloud_cover);
    let _ = writeln!(out, "  {}: {uv:.0} ({})", t("weather.uvIndex"), uv_label(uv));

    let aqi = aqi_level(d.air_quality.aqi);
    let _ = writeln!(out, "  {}: {} ({})", t("weather.airQuality"), aqi.label, aqi.description);

    let _ = writeln!(out, "\n{}", t("forecast.hourly"));
    if d.hourly.is_empty() {
        let _ = writeln!(out, "  {}", t("forecast.hourlyEmpty"));
    }
    for slot in &d.hourly {
        let _ = writeln!(
            out,
            "  {}  {} {:>6}  {} {}",
            slot.time.format("%H:%M"),
            cloud_glyph(slot.cloud_cover),
            temp(slot.temperature),
            format_wind_speed(slot.wind_speed, d.units, prefs.wind),
            wind_arrow(slot.wind_direction)
        );
    }

    let _ = writeln!(out, "\n{}", t("forecast.fiveDay"));
    if d.daily.is_empty() {
        let _ = writeln!(out, "  {}", t("forecast.empty"));
    }
    let tomorrow = now.with_timezone(tz).date_naive().succ_opt();
    for day in &d.daily {
        let label = if Some(day.date) == tomorrow { t("forecast.tomorrow") } else { day.label.as_str() };
        let _ = writeln!(
            out,
            "  {:<24} {} {:>6} / {:<6} {}",
            label,
            cloud_glyph(day.cloud_cover),
            temp(day.max_temp),
            temp(day.min_temp),
            day.description
        );
    }

    out
}

pub fn history(entries: &[Location], lang: Language) -> String {
    if entries.is_empty() {
        return translate(lang, "history.empty").to_string();
    }

    let mut out = format!("{}\n", translate(lang, "history.title"));
    for (i, loc) in entries.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} ({:.2}, {:.2})", i + 1, loc.display_name(), loc.lat, loc.lon);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use weatherdash_core::{
        UnitSystem,
        model::{
            AirQuality, CurrentConditions, DailySummary, ForecastSet, HourlySlot, PollutantLevels,
        },
    };

    fn sample(hourly: Vec<HourlySlot>, daily: Vec<DailySummary>) -> Dashboard {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 5, 30, 0).unwrap();
        Dashboard {
            location: Location {
                name: "Oslo".into(),
                lat: 59.91,
                lon: 10.75,
                country: "NO".into(),
                state: None,
            },
            current: CurrentConditions {
                location_name: "Oslo".into(),
                temperature: 21.4,
                feels_like: 20.6,
                humidity: 40,
                pressure: 1013.0,
                wind_speed: 5.0,
                wind_direction: 90,
                cloud_cover: 10,
                visibility: Some(10_000),
                sunrise: ts,
                sunset: ts,
                observed_at: ts,
                description: "clear sky".into(),
                icon: "01d".into(),
            },
            forecast: ForecastSet::default(),
            air_quality: AirQuality { aqi: 2, components: PollutantLevels::default(), measured_at: ts },
            daily,
            hourly,
            units: UnitSystem::Metric,
            language: Language::En,
        }
    }

    #[test]
    fn renders_current_conditions() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let text = dashboard(&sample(vec![], vec![]), Units::default(), &Utc, now);

        assert!(text.starts_with("Oslo, NO\n"));
        assert!(text.contains("21°C  clear sky"));
        assert!(text.contains("Wind: 18 km/h →"));
        assert!(text.contains("Sunrise: 05:30"));
        assert!(text.contains("Air Quality: Fair"));
        assert!(text.contains("No hourly forecast data available"));
        assert!(text.contains("No forecast data available"));
    }

    #[test]
    fn renders_forecast_rows() {
        let hourly = vec![HourlySlot {
            target_hour: 12,
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            icon: "01d".into(),
            cloud_cover: 0,
            wind_speed: 1.0,
            wind_direction: 0,
            temperature: 18.0,
        }];
        let daily = vec![DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            label: "Monday, Jun 3".into(),
            icon: "01d".into(),
            min_temp: 11.0,
            max_temp: 19.0,
            description: "sunny".into(),
            cloud_cover: 0,
        }];
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let text = dashboard(&sample(hourly, daily), Units::default(), &Utc, now);

        assert!(text.contains("12:00"));
        assert!(text.contains("Monday, Jun 3"));
        assert!(text.contains("19°C"));
        assert!(!text.contains("No forecast data available"));
    }

    #[test]
    fn next_day_is_labelled_tomorrow() {
        let day = |d, label: &str| DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 6, d).unwrap(),
            label: label.into(),
            icon: "01d".into(),
            min_temp: 10.0,
            max_temp: 20.0,
            description: "sunny".into(),
            cloud_cover: 0,
        };
        let daily = vec![day(2, "Sunday, Jun 2"), day(3, "Monday, Jun 3")];
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let text = dashboard(&sample(vec![], daily), Units::default(), &Utc, now);

        assert!(text.contains("Tomorrow"));
        assert!(!text.contains("Sunday, Jun 2"));
        assert!(text.contains("Monday, Jun 3"));
    }

    #[test]
    fn empty_history_message() {
        assert_eq!(history(&[], Language::En), "No recent locations");
    }
}
