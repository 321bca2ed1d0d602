use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Temperatures and air readings for one forecast point, in provider units (Kelvin, hPa).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: u8,
    #[serde(default)]
    pub sea_level: Option<f64>,
    #[serde(default)]
    pub grnd_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkyCondition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Meters per second.
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Clouds {
    pub all: u8,
}

/// One point of the 3-hourly forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<SkyCondition>,
    #[serde(default)]
    pub clouds: Clouds,
    pub wind: Wind,
    /// Meters. Not always present in the provider payload.
    #[serde(default)]
    pub visibility: Option<f64>,
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub dt_txt: Option<String>,
}

impl ForecastEntry {
    /// Timestamp as UTC, `None` when `dt` is outside the representable range.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.dt, 0)
    }

    /// The primary sky condition; the provider lists the dominant one first.
    pub fn condition(&self) -> Option<&SkyCondition> {
        self.weather.first()
    }
}

/// Forecast points in the order the provider returned them (ascending `dt`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastSeries(pub Vec<ForecastEntry>);

impl ForecastSeries {
    pub fn entries(&self) -> &[ForecastEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastEntry> {
        self.0.iter()
    }
}

impl From<Vec<ForecastEntry>> for ForecastSeries {
    fn from(entries: Vec<ForecastEntry>) -> Self {
        Self(entries)
    }
}

impl<'a> IntoIterator for &'a ForecastSeries {
    type Item = &'a ForecastEntry;
    type IntoIter = std::slice::Iter<'a, ForecastEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// Location metadata returned alongside the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub coord: Coord,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub population: u64,
    /// Shift in seconds from UTC.
    #[serde(default)]
    pub timezone: i32,
    pub sunrise: i64,
    pub sunset: i64,
}

impl City {
    /// The city's UTC offset; falls back to UTC for out-of-range values.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timezone).unwrap_or_else(|| Utc.fix())
    }

    pub fn sunrise_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::<Utc>::from_timestamp(self.sunrise, 0).map(|t| t.with_timezone(&self.offset()))
    }

    pub fn sunset_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::<Utc>::from_timestamp(self.sunset, 0).map(|t| t.with_timezone(&self.offset()))
    }

    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Full payload of the 5-day / 3-hour forecast endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub cnt: u32,
    pub list: ForecastSeries,
    pub city: City,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "cod": "200",
        "message": 0,
        "cnt": 1,
        "list": [{
            "dt": 1718668800,
            "main": {
                "temp": 296.37, "feels_like": 296.1, "temp_min": 295.0, "temp_max": 297.2,
                "pressure": 1015, "sea_level": 1015, "grnd_level": 1003,
                "humidity": 52, "temp_kf": 0.4
            },
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "clouds": {"all": 3},
            "wind": {"speed": 1.64, "deg": 212, "gust": 2.1},
            "visibility": 10000,
            "pop": 0,
            "sys": {"pod": "d"},
            "dt_txt": "2024-06-18 00:00:00"
        }],
        "city": {
            "id": 2643743,
            "name": "London",
            "coord": {"lat": 51.5085, "lon": -0.1257},
            "country": "GB",
            "population": 1000000,
            "timezone": 3600,
            "sunrise": 1718658254,
            "sunset": 1718707547
        }
    }"#;

    #[test]
    fn parses_provider_payload() {
        let parsed: ForecastResponse = serde_json::from_str(PAYLOAD).expect("payload should parse");

        assert_eq!(parsed.cnt, 1);
        assert_eq!(parsed.list.len(), 1);

        let entry = &parsed.list.entries()[0];
        assert_eq!(entry.main.humidity, 52);
        assert_eq!(entry.visibility, Some(10000.0));
        assert_eq!(entry.condition().map(|c| c.icon.as_str()), Some("01d"));
        assert_eq!(entry.wind.gust, Some(2.1));

        assert_eq!(parsed.city.display_name(), "London, GB");
        assert_eq!(parsed.city.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{
            "dt": 0,
            "main": {"temp": 280, "feels_like": 279, "temp_min": 278, "temp_max": 281, "pressure": 1000, "humidity": 80},
            "wind": {"speed": 3.0}
        }"#;

        let entry: ForecastEntry = serde_json::from_str(json).expect("entry should parse");
        assert!(entry.weather.is_empty());
        assert!(entry.visibility.is_none());
        assert_eq!(entry.clouds.all, 0);
        assert!(entry.condition().is_none());
    }

    #[test]
    fn sunrise_uses_city_offset() {
        let parsed: ForecastResponse = serde_json::from_str(PAYLOAD).expect("payload should parse");
        let sunrise = parsed.city.sunrise_time().expect("sunrise in range");

        // 1718658254 is 21:04:14 UTC; +1h puts it at 22:04 local.
        assert_eq!(sunrise.format("%H:%M").to_string(), "22:04");
    }
}
