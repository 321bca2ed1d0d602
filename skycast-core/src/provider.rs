use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, ForecastResponse, provider::openweather::OpenWeatherClient};

pub mod openweather;

/// Everything that can go wrong while fetching a forecast.
///
/// The `Display` text is what the dashboard shows after "An error has occurred: ".
#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status code {code}")]
    Status { code: u16, body: String },

    #[error("Invalid forecast response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The background task running the fetch died before producing a result.
    #[error("Forecast task failed: {0}")]
    Task(String),
}

impl FetchFailure {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchFailure::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ForecastFetcher: Send + Sync + Debug {
    async fn fetch_forecast(&self, location: &str) -> Result<ForecastResponse, FetchFailure>;
}

/// Construct the OpenWeather client from config.
///
/// Environment overrides are already folded into `config` by [`Config::load`].
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `skycast configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let client = match config.endpoint.as_deref() {
        Some(endpoint) => OpenWeatherClient::with_endpoint(api_key, endpoint),
        None => OpenWeatherClient::new(api_key),
    };

    Ok(client)
}
