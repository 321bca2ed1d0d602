//! Conversions from provider units (Kelvin, m/s, meters) to display units.

const KELVIN_OFFSET: f64 = 273.15;

/// Whole degrees Celsius, rounded down.
pub fn kelvin_to_celsius(kelvin: f64) -> i32 {
    (kelvin - KELVIN_OFFSET).floor() as i32
}

pub fn wind_speed_kmh(mps: f64) -> f64 {
    mps * 3.6
}

/// e.g. `1.64` m/s -> `"6km/h"`.
pub fn format_wind_speed(mps: f64) -> String {
    format!("{:.0}km/h", wind_speed_kmh(mps))
}

/// e.g. `10000` m -> `"10km"`.
pub fn meters_to_kilometers(meters: f64) -> String {
    format!("{:.0}km", meters / 1000.0)
}
