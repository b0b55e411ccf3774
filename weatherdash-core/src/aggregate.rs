//! Folding a 3-hourly forecast into daily summaries and fixed hourly slots.
//!
//! Both functions are pure and rebuild their output from the whole
//! [`ForecastSet`] on every call.

use chrono::{DateTime, TimeZone, Timelike, Utc};

use crate::{
    i18n,
    model::{DailySummary, ForecastSet, HourlySlot, Language},
};

pub const MAX_DAYS: usize = 5;

/// Local hours whose sample stands in for the whole day.
const MIDDAY_HOURS: std::ops::RangeInclusive<u32> = 11..=13;

/// Slots shown in the hourly panel, in display order.
pub const TARGET_HOURS: [u32; 5] = [12, 15, 18, 21, 0];

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Group entries by local calendar date.
///
/// Min/max cover every entry of the date; icon, description and cloud cover
/// come from the first entry and are replaced by any entry between 11:00 and
/// 13:00. With more than five dates the first one (today) is dropped.
pub fn build_daily_summaries<Tz: TimeZone>(
    set: &ForecastSet,
    tz: &Tz,
    lang: Language,
) -> Vec<DailySummary> {
    let mut days: Vec<DailySummary> = Vec::new();

    for entry in &set.entries {
        let local = entry.timestamp.with_timezone(tz);
        let date = local.date_naive();

        match days.iter_mut().find(|d| d.date == date) {
            None => days.push(DailySummary {
                date,
                label: i18n::day_label(lang, date),
                icon: entry.icon.clone(),
                min_temp: entry.temperature,
                max_temp: entry.temperature,
                description: entry.description.clone(),
                cloud_cover: entry.cloud_cover,
            }),
            Some(day) => {
                day.min_temp = day.min_temp.min(entry.temperature);
                day.max_temp = day.max_temp.max(entry.temperature);

                if MIDDAY_HOURS.contains(&local.hour()) {
                    day.icon = entry.icon.clone();
                    day.description = entry.description.clone();
                    day.cloud_cover = entry.cloud_cover;
                }
            }
        }
    }

    if days.len() > MAX_DAYS {
        days.remove(0);
    }
    days.truncate(MAX_DAYS);
    days
}

/// Circular distance between two hours of a 24h clock, at most 12.
pub fn circular_hour_distance(a: u32, b: u32) -> u32 {
    let diff = a.abs_diff(b) % 24;
    diff.min(24 - diff)
}

/// Pick the entry nearest to each of [`TARGET_HOURS`].
///
/// Candidates are entries less than two whole days away from local midnight
/// of `now`. Ties go to the earliest entry in input order.
pub fn build_hourly_slots<Tz: TimeZone>(set: &ForecastSet, now: &DateTime<Tz>) -> Vec<HourlySlot> {
    let tz = now.timezone();
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .unwrap_or_else(|| now.clone())
        .with_timezone(&Utc);

    let candidates: Vec<_> = set
        .entries
        .iter()
        .filter(|entry| {
            let diff = (entry.timestamp - midnight).num_milliseconds();
            diff.abs() / DAY_MILLIS <= 1
        })
        .map(|entry| (entry, entry.timestamp.with_timezone(&tz)))
        .collect();

    TARGET_HOURS
        .iter()
        .filter_map(|&target| {
            let mut best = None;
            let mut best_distance = u32::MAX;

            for (entry, local) in &candidates {
                let distance = circular_hour_distance(local.hour(), target);
                if distance < best_distance {
                    best_distance = distance;
                    best = Some((*entry, local));
                }
            }

            best.map(|(entry, local)| HourlySlot {
                target_hour: target,
                time: local.time(),
                icon: entry.icon.clone(),
                cloud_cover: entry.cloud_cover,
                wind_speed: entry.wind_speed,
                wind_direction: entry.wind_direction,
                temperature: entry.temperature,
            })
        })
        .take(TARGET_HOURS.len())
        .collect()
}
