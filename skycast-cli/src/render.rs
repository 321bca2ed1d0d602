//! Terminal rendering of the dashboard.
//!
//! Everything here turns a [`FetchState`] into plain text; printing is left
//! to the caller.

use chrono::{DateTime, FixedOffset};
use skycast_core::{
    City, DailyRepresentative, FetchState, ForecastEntry, ForecastResponse,
    units::{format_wind_speed, kelvin_to_celsius, meters_to_kilometers},
};
use unicode_width::UnicodeWidthStr;

pub const ERROR_PREFIX: &str = "An error has occurred: ";

/// Shown when the provider omits visibility.
const DEFAULT_VISIBILITY_M: f64 = 10_000.0;

const HOURLY_SKELETON_SLOTS: usize = 5;
const DAILY_SKELETON_ROWS: usize = 7;

/// Entries per row of the hourly strip: one day at a 3-hour cadence.
const HOURLY_STRIP_SLOTS: usize = 8;

/// Terminal columns per hourly slot; fits "12:00 AM".
const HOURLY_SLOT_WIDTH: usize = 8;

pub fn render(state: &FetchState) -> String {
    match state {
        FetchState::Pending => render_skeleton(),
        FetchState::Failed(message) => format!("{ERROR_PREFIX}{message}"),
        FetchState::Loaded(response) => render_loaded(response, state),
    }
}

/// Placeholder blocks laid out like the loaded view, with no data in them.
pub fn render_skeleton() -> String {
    let bar = |w: usize| "░".repeat(w);

    let mut lines = vec![
        format!("{}  {}", bar(10), bar(14)),
        String::new(),
        format!("  {}", bar(8)),
        format!("  {} {}", bar(6), bar(4)),
        format!("  {} {}", bar(4), bar(4)),
        String::new(),
        format!("  {}", vec![bar(8); HOURLY_SKELETON_SLOTS].join("  ")),
        String::new(),
        format!("  {}   {}", bar(10), bar(30)),
        String::new(),
        bar(18),
    ];
    lines.extend(
        (0..DAILY_SKELETON_ROWS).map(|_| format!("  {}  {}  {}", bar(2), bar(12), bar(24))),
    );

    join_lines(&lines)
}

fn render_loaded(response: &ForecastResponse, state: &FetchState) -> String {
    let city = &response.city;
    let offset = city.offset();

    let mut lines = vec![format!("☀ Weather · {}", city.display_name()), String::new()];

    let Some(now) = state.snapshot() else {
        lines.push(format!("No forecast data for {}.", city.name));
        return join_lines(&lines);
    };

    if let Some(t) = local_time(now, offset) {
        lines.push(format!("{} ({})", t.format("%A"), t.format("%d.%m.%Y")));
    }

    lines.push(format!("  {}°", kelvin_to_celsius(now.main.temp)));
    lines.push(format!("  Feels like {}°", kelvin_to_celsius(now.main.feels_like)));
    lines.push(format!(
        "  {}°↓  {}°↑",
        kelvin_to_celsius(now.main.temp_min),
        kelvin_to_celsius(now.main.temp_max)
    ));
    lines.push(String::new());

    lines.extend(hourly_strip(response, offset));

    let (description, icon) = condition_parts(now);
    lines.push(format!("  {} {}", icon_glyph(icon), capitalize(description)));
    lines.push(format!("  {}", details_line(now, city)));
    lines.push(String::new());

    lines.push("Forecast (7 days)".to_string());
    lines.extend(state.daily().iter().map(|day| daily_row(day, city)));

    join_lines(&lines)
}

fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Time, icon and temperature for every entry, wrapped into blocks of
/// [`HOURLY_STRIP_SLOTS`] entries. Each block is three rows plus a blank line.
fn hourly_strip(response: &ForecastResponse, offset: FixedOffset) -> Vec<String> {
    let mut lines = Vec::new();

    for block in response.list.entries().chunks(HOURLY_STRIP_SLOTS) {
        let mut times = Vec::with_capacity(block.len());
        let mut icons = Vec::with_capacity(block.len());
        let mut temps = Vec::with_capacity(block.len());

        for entry in block {
            let time = local_time(entry, offset)
                .map(|t| t.format("%-I:%M %p").to_string())
                .unwrap_or_else(|| "--:--".to_string());
            times.push(pad_left(&time, HOURLY_SLOT_WIDTH));
            icons.push(pad_left(icon_glyph(condition_parts(entry).1), HOURLY_SLOT_WIDTH));
            let temp = format!("{}°", kelvin_to_celsius(entry.main.temp));
            temps.push(pad_left(&temp, HOURLY_SLOT_WIDTH));
        }

        lines.push(format!("  {}", times.join(" ")));
        lines.push(format!("  {}", icons.join(" ")));
        lines.push(format!("  {}", temps.join(" ")));
        lines.push(String::new());
    }

    lines
}

/// Right-aligns `s` to `width` terminal columns; wide glyphs count double.
fn pad_left(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{}{s}", " ".repeat(pad))
}

fn daily_row(day: &DailyRepresentative<'_>, city: &City) -> String {
    let entry = day.entry;
    let (description, icon) = condition_parts(entry);

    format!(
        "  {} {}  {:<9}  {:<18}  {}° (feels {}°)  {}°↓ {}°↑\n     {}",
        icon_glyph(icon),
        day.date.format("%d.%m"),
        day.date.format("%A").to_string(),
        capitalize(description),
        kelvin_to_celsius(entry.main.temp),
        kelvin_to_celsius(entry.main.feels_like),
        kelvin_to_celsius(entry.main.temp_min),
        kelvin_to_celsius(entry.main.temp_max),
        details_line(entry, city),
    )
}

fn details_line(entry: &ForecastEntry, city: &City) -> String {
    let clock = |t: Option<DateTime<FixedOffset>>| {
        t.map(|t| t.format("%-H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    };

    format!(
        "Visibility {}  Humidity {}%  Wind {}  Pressure {} hPa  Sunrise {}  Sunset {}",
        meters_to_kilometers(entry.visibility.unwrap_or(DEFAULT_VISIBILITY_M)),
        entry.main.humidity,
        format_wind_speed(entry.wind.speed),
        entry.main.pressure,
        clock(city.sunrise_time()),
        clock(city.sunset_time()),
    )
}

fn local_time(entry: &ForecastEntry, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    entry.time().map(|t| t.with_timezone(&offset))
}

fn condition_parts(entry: &ForecastEntry) -> (&str, &str) {
    entry
        .condition()
        .map(|c| (c.description.as_str(), c.icon.as_str()))
        .unwrap_or(("", "01d"))
}

/// Terminal glyph for an OpenWeather icon code such as `"10n"`.
pub fn icon_glyph(icon: &str) -> &'static str {
    let night = icon.ends_with('n');
    match icon.get(..2).unwrap_or("") {
        "01" if night => "🌙",
        "01" => "☀️",
        "02" if night => "☁️",
        "02" => "⛅",
        "03" | "04" => "☁️",
        "09" => "🌧️",
        "10" if night => "🌧️",
        "10" => "🌦️",
        "11" => "⛈️",
        "13" => "❄️",
        "50" => "🌫️",
        _ => "·",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
