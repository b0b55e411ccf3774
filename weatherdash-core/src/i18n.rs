//! Static UI strings and calendar names for the supported languages.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::Language;

const EN: &[(&str, &str)] = &[
    ("app.title", "Weather App"),
    ("app.loading", "Loading..."),
    ("app.offline", "No internet connection"),
    ("app.noLocation", "No location selected"),
    ("app.noLocationHint", "Use the search bar above or the Current Location button"),
    ("weather.airQuality", "Air Quality"),
    ("weather.feelsLike", "Feels Like"),
    ("weather.humidity", "Humidity"),
    ("weather.wind", "Wind"),
    ("weather.pressure", "Pressure"),
    ("weather.visibility", "Visibility"),
    ("weather.sunrise", "Sunrise"),
    ("weather.sunset", "Sunset"),
    ("weather.uvIndex", "UV Index"),
    ("forecast.fiveDay", "5 Days Forecast"),
    ("forecast.hourly", "Hourly Forecast"),
    ("forecast.tomorrow", "Tomorrow"),
    ("forecast.empty", "No forecast data available"),
    ("forecast.hourlyEmpty", "No hourly forecast data available"),
    ("history.title", "Recent locations"),
    ("history.empty", "No recent locations"),
];

const RU: &[(&str, &str)] = &[
    ("app.title", "Погодное Приложение"),
    ("app.loading", "Загрузка..."),
    ("app.offline", "Нет подключения к интернету"),
    ("app.noLocation", "Местоположение не выбрано"),
    ("app.noLocationHint", "Воспользуйтесь поиском или кнопкой текущего местоположения"),
    ("weather.airQuality", "Качество Воздуха"),
    ("weather.feelsLike", "Ощущается как"),
    ("weather.humidity", "Влажность"),
    ("weather.wind", "Ветер"),
    ("weather.pressure", "Давление"),
    ("weather.visibility", "Видимость"),
    ("weather.sunrise", "Восход"),
    ("weather.sunset", "Закат"),
    ("weather.uvIndex", "УФ-индекс"),
    ("forecast.fiveDay", "Прогноз на 5 дней"),
    ("forecast.hourly", "Почасовой прогноз"),
    ("forecast.tomorrow", "Завтра"),
    ("forecast.empty", "Нет данных прогноза"),
    ("forecast.hourlyEmpty", "Нет данных почасового прогноза"),
    ("history.title", "Недавние места"),
    ("history.empty", "Нет недавних мест"),
];

/// Look up a UI string; unknown keys come back unchanged.
pub fn translate<'a>(lang: Language, key: &'a str) -> &'a str {
    let table = match lang {
        Language::En => EN,
        Language::Ru => RU,
    };

    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}

pub fn weekday_name(lang: Language, day: Weekday) -> &'static str {
    const EN_DAYS: [&str; 7] =
        ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
    const RU_DAYS: [&str; 7] =
        ["понедельник", "вторник", "среда", "четверг", "пятница", "суббота", "воскресенье"];

    let idx = day.num_days_from_monday() as usize;
    match lang {
        Language::En => EN_DAYS[idx],
        Language::Ru => RU_DAYS[idx],
    }
}

/// Abbreviated month; Russian uses the genitive form that follows a day number.
pub fn month_short(lang: Language, month: u32) -> &'static str {
    const EN_MONTHS: [&str; 12] =
        ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
    const RU_MONTHS: [&str; 12] = [
        "янв.", "февр.", "мар.", "апр.", "мая", "июн.", "июл.", "авг.", "сент.", "окт.", "нояб.",
        "дек.",
    ];

    let idx = (month.clamp(1, 12) - 1) as usize;
    match lang {
        Language::En => EN_MONTHS[idx],
        Language::Ru => RU_MONTHS[idx],
    }
}

/// Long day label, e.g. "Monday, Oct 19" or "понедельник, 19 окт.".
pub fn day_label(lang: Language, date: NaiveDate) -> String {
    let weekday = weekday_name(lang, date.weekday());
    let month = month_short(lang, date.month());

    match lang {
        Language::En => format!("{weekday}, {month} {}", date.day()),
        Language::Ru => format!("{weekday}, {} {month}", date.day()),
    }
}
