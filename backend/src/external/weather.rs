//! Daily forecast client
//!
//! Talks to an Open-Meteo compatible `/forecast` endpoint and turns the
//! parallel `daily` arrays into a [`ForecastSeries`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{ForecastColumns, ForecastSeries, GpsCoordinates, QueryOutcome};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

const DAILY_VARIABLES: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max";

/// Anything that can produce a daily forecast for a point
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn daily_forecast(&self, location: GpsCoordinates) -> QueryOutcome<ForecastSeries>;
}

/// Forecast API client
#[derive(Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
    forecast_days: usize,
}

/// Open-Meteo forecast response
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    daily: Option<OpenMeteoDaily>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    #[serde(default)]
    time: Vec<chrono::NaiveDate>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    windspeed_10m_max: Vec<Option<f64>>,
}

impl ForecastClient {
    /// Create a client from configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("forecast HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            forecast_days: config.forecast_days,
        })
    }

    /// Fetch the daily forecast for one location
    pub async fn get_forecast(&self, location: GpsCoordinates) -> QueryOutcome<ForecastSeries> {
        let url = format!("{}/forecast", self.base_url);
        let forecast_days = self.forecast_days.to_string();

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("daily", DAILY_VARIABLES.to_string()),
                ("forecast_days", forecast_days),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    latitude = %location.latitude,
                    longitude = %location.longitude,
                    "Forecast request failed: {}",
                    e
                );
                return QueryOutcome::Failed(format!("forecast request failed: {}", e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Forecast API returned an error status");
            return QueryOutcome::Failed(format!("status {}", status));
        }

        match response.text().await {
            Ok(body) => parse_forecast(location, &body, self.forecast_days),
            Err(e) => QueryOutcome::Failed(format!("forecast body unreadable: {}", e)),
        }
    }
}

#[async_trait]
impl ForecastSource for ForecastClient {
    async fn daily_forecast(&self, location: GpsCoordinates) -> QueryOutcome<ForecastSeries> {
        self.get_forecast(location).await
    }
}

/// Interpret a forecast response body.
///
/// Bodies that are not the expected JSON shape are `Failed`; a missing or
/// empty `daily` block, or columns of unequal length, are `Absent`. A series
/// shorter than the horizon is kept as is.
pub fn parse_forecast(
    location: GpsCoordinates,
    body: &str,
    horizon_days: usize,
) -> QueryOutcome<ForecastSeries> {
    let parsed: OpenMeteoResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => return QueryOutcome::Failed(format!("malformed forecast response: {}", e)),
    };

    let Some(daily) = parsed.daily else {
        tracing::debug!("Forecast response has no daily block");
        return QueryOutcome::Absent;
    };

    let columns = ForecastColumns {
        dates: daily.time,
        temp_max_celsius: to_decimals(daily.temperature_2m_max),
        temp_min_celsius: to_decimals(daily.temperature_2m_min),
        precipitation_mm: to_decimals(daily.precipitation_sum),
        wind_max_kmh: to_decimals(daily.windspeed_10m_max),
    };

    match ForecastSeries::from_columns(location, columns, horizon_days) {
        Some(series) => {
            if !series.covers_horizon(horizon_days) {
                tracing::debug!(
                    days = series.days.len(),
                    horizon_days,
                    "Forecast shorter than horizon; totals cover fewer days"
                );
            }
            QueryOutcome::Data(series)
        }
        None => QueryOutcome::Absent,
    }
}

fn to_decimals(values: Vec<Option<f64>>) -> Vec<Option<Decimal>> {
    values
        .into_iter()
        .map(|v| v.and_then(Decimal::from_f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn karachi() -> GpsCoordinates {
        GpsCoordinates::new(Decimal::new(248607, 4), Decimal::new(670011, 4))
    }

    #[test]
    fn test_parse_keeps_nulls_as_missing() {
        let body = r#"{
            "latitude": 24.86,
            "longitude": 67.0,
            "daily": {
                "time": ["2025-07-01", "2025-07-02"],
                "temperature_2m_max": [35.2, null],
                "temperature_2m_min": [28.0, 27.5],
                "precipitation_sum": [null, 12.5],
                "windspeed_10m_max": [20.1, 18.0]
            }
        }"#;
        let series = parse_forecast(karachi(), body, 7).data().unwrap();
        assert_eq!(series.days.len(), 2);
        assert_eq!(series.days[0].precipitation_mm, None);
        assert_eq!(series.days[1].temp_max_celsius, None);
        assert_eq!(series.precipitation_total(), Some((Decimal::new(125, 1), 1)));
    }

    #[test]
    fn test_parse_without_daily_is_absent() {
        let outcome = parse_forecast(karachi(), r#"{"latitude": 24.86}"#, 7);
        assert_eq!(outcome, QueryOutcome::Absent);
    }

    #[test]
    fn test_parse_garbage_is_failed() {
        let outcome = parse_forecast(karachi(), "<html>bad gateway</html>", 7);
        assert!(matches!(outcome, QueryOutcome::Failed(_)));
    }
}
