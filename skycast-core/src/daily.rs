//! Picks one representative forecast entry per calendar day.
//!
//! Dates are bucketed on the UTC day boundary. Within a date the first entry
//! at or after [`DAYTIME_START_HOUR`] wins; a date with only early-morning
//! entries produces no representative at all.

use chrono::{NaiveDate, TimeZone, Timelike, Utc};

use crate::model::{ForecastEntry, ForecastSeries};

/// Earliest hour of day (inclusive) an entry may represent its date.
pub const DAYTIME_START_HOUR: u32 = 6;

/// A borrowed view of the entry chosen to summarise `date`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRepresentative<'a> {
    pub date: NaiveDate,
    pub entry: &'a ForecastEntry,
}

/// UTC calendar date of an entry.
pub fn calendar_date(entry: &ForecastEntry) -> Option<NaiveDate> {
    entry.time().map(|t| t.date_naive())
}

/// Distinct calendar dates in first-seen order.
pub fn unique_dates(series: &ForecastSeries) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    for date in series.iter().filter_map(calendar_date) {
        if !dates.contains(&date) {
            dates.push(date);
        }
    }
    dates
}

/// One representative per date, reading hour-of-day in UTC.
pub fn daily_representatives(series: &ForecastSeries) -> Vec<DailyRepresentative<'_>> {
    daily_representatives_in(series, &Utc)
}

/// One representative per date, reading hour-of-day in `tz`.
///
/// Only the hour check uses `tz`; date bucketing stays on UTC.
pub fn daily_representatives_in<'a, Tz: TimeZone>(
    series: &'a ForecastSeries,
    tz: &Tz,
) -> Vec<DailyRepresentative<'a>> {
    unique_dates(series)
        .into_iter()
        .filter_map(|date| {
            series
                .iter()
                .find(|entry| {
                    calendar_date(entry) == Some(date) && is_daytime(entry, tz)
                })
                .map(|entry| DailyRepresentative { date, entry })
        })
        .collect()
}

fn is_daytime<Tz: TimeZone>(entry: &ForecastEntry, tz: &Tz) -> bool {
    entry
        .time()
        .map(|t| t.with_timezone(tz).hour() >= DAYTIME_START_HOUR)
        .unwrap_or(false)
}
