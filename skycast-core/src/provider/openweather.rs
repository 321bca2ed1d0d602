use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::model::ForecastResponse;

use super::{FetchFailure, ForecastFetcher};

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Entries requested per fetch: 7 days at 8 points a day.
pub const FORECAST_COUNT: u32 = 56;

#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: String, endpoint: impl Into<String>) -> Self {
        Self {
            api_key,
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl ForecastFetcher for OpenWeatherClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_forecast(&self, location: &str) -> Result<ForecastResponse, FetchFailure> {
        let count = FORECAST_COUNT.to_string();

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("cnt", count.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%status, body = %truncate_body(&body), "forecast request rejected");
            return Err(FetchFailure::Status {
                code: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: ForecastResponse = serde_json::from_str(&body)?;
        debug!(entries = parsed.list.len(), city = %parsed.city.name, "forecast received");

        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("city not found"), "city not found");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.len(), 200 + 3);
    }

    #[test]
    fn debug_hides_api_key() {
        let client = OpenWeatherClient::new("SECRET".into());
        let dbg = format!("{client:?}");
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains(DEFAULT_ENDPOINT));
    }
}
