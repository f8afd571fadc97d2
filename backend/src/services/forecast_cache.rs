//! Per-render forecast memo
//!
//! Popups, charts and advisories all need the same district forecasts. One
//! cache lives for one render, so each canonical district is fetched at most
//! once per request and never shared across requests.

use std::collections::BTreeMap;

use shared::{ForecastSeries, GpsCoordinates, QueryOutcome};

use crate::external::ForecastSource;

#[derive(Debug, Default)]
pub struct ForecastCache {
    entries: BTreeMap<String, QueryOutcome<ForecastSeries>>,
    fetches: usize,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forecast for a canonical district, fetching it on first use.
    /// Absent and failed outcomes are memoized too.
    pub async fn get<S: ForecastSource>(
        &mut self,
        source: &S,
        canonical: &str,
        location: GpsCoordinates,
    ) -> QueryOutcome<ForecastSeries> {
        if let Some(hit) = self.entries.get(canonical) {
            return hit.clone();
        }

        let outcome = source.daily_forecast(location).await;
        self.fetches += 1;
        if let Some(note) = outcome.unavailable_note() {
            tracing::debug!(district = canonical, "Forecast unavailable: {}", note);
        }
        self.entries.insert(canonical.to_string(), outcome.clone());
        outcome
    }

    /// Remote fetches issued so far
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}
