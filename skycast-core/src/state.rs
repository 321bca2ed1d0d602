//! Fetch lifecycle for the dashboard.
//!
//! [`FetchState`] is the pending / failed / loaded tri-state the renderer
//! consumes. [`Dashboard`] owns the current location and re-fetches whenever
//! it changes. A fetch that was started for an older location is discarded
//! when it lands instead of overwriting newer data.

use tracing::debug;

use crate::{
    daily::{DailyRepresentative, daily_representatives_in},
    model::{ForecastEntry, ForecastResponse},
    provider::{FetchFailure, ForecastFetcher},
    snapshot::current_snapshot,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Pending,
    Failed(String),
    Loaded(ForecastResponse),
}

impl FetchState {
    pub fn from_result(result: Result<ForecastResponse, FetchFailure>) -> Self {
        match result {
            Ok(response) => FetchState::Loaded(response),
            Err(err) => FetchState::Failed(err.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }

    pub fn response(&self) -> Option<&ForecastResponse> {
        match self {
            FetchState::Loaded(response) => Some(response),
            _ => None,
        }
    }

    /// Current conditions, absent unless loaded with a non-empty series.
    pub fn snapshot(&self) -> Option<&ForecastEntry> {
        self.response().and_then(|r| current_snapshot(&r.list))
    }

    /// Per-day representatives, reading hour-of-day in the forecast city's offset.
    pub fn daily(&self) -> Vec<DailyRepresentative<'_>> {
        match self.response() {
            Some(r) => daily_representatives_in(&r.list, &r.city.offset()),
            None => Vec::new(),
        }
    }
}

/// Identifies one fetch started by [`Dashboard::set_location`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    location: String,
}

impl Ticket {
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns the selected location and the latest fetch outcome for it.
#[derive(Debug, Default)]
pub struct Dashboard {
    location: Option<String>,
    generation: u64,
    state: FetchState,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Switch to `location` and go back to pending.
    ///
    /// Any fetch still in flight for an earlier location becomes stale.
    pub fn set_location(&mut self, location: impl Into<String>) -> Ticket {
        let location = location.into();
        self.generation += 1;
        self.location = Some(location.clone());
        self.state = FetchState::Pending;

        debug!(generation = self.generation, %location, "location changed");

        Ticket { generation: self.generation, location }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Store a fetch outcome. Returns `false` and leaves state untouched for stale tickets.
    pub fn apply(
        &mut self,
        ticket: &Ticket,
        result: Result<ForecastResponse, FetchFailure>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                location = %ticket.location,
                "discarding stale forecast"
            );
            return false;
        }

        if let Err(err) = &result {
            debug!(
                location = %ticket.location,
                status = ?err.status_code(),
                error = %err,
                "forecast fetch failed"
            );
        }

        self.state = FetchState::from_result(result);
        true
    }

    /// Set the location, fetch, and apply in one go.
    pub async fn refresh<F>(&mut self, fetcher: &F, location: impl Into<String>) -> &FetchState
    where
        F: ForecastFetcher + ?Sized,
    {
        let ticket = self.set_location(location);
        let result = fetcher.fetch_forecast(ticket.location()).await;
        self.apply(&ticket, result);
        &self.state
    }
}
