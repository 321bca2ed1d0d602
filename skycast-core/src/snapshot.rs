use crate::model::{ForecastEntry, ForecastSeries};

/// The "current conditions" entry: strictly the first one in series order.
pub fn current_snapshot(series: &ForecastSeries) -> Option<&ForecastEntry> {
    series.entries().first()
}
