//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather forecast fetcher
//! - Shared domain models for the 3-hourly forecast payload
//! - Pure views over a forecast: the current snapshot and one entry per day
//! - The fetch lifecycle a dashboard renders from
//!
//! It is used by `skycast-cli`, but can also be reused by other front ends.

pub mod config;
pub mod daily;
pub mod model;
pub mod provider;
pub mod snapshot;
pub mod state;
pub mod units;

pub use config::Config;
pub use daily::{DailyRepresentative, daily_representatives, daily_representatives_in};
pub use model::{City, ForecastEntry, ForecastResponse, ForecastSeries};
pub use provider::{FetchFailure, ForecastFetcher, openweather::OpenWeatherClient};
pub use snapshot::current_snapshot;
pub use state::{Dashboard, FetchState, Ticket};
