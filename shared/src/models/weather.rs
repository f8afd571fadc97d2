//! Weather forecast models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// One day of a daily forecast. Missing values stay `None`, never zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_max_celsius: Option<Decimal>,
    pub temp_min_celsius: Option<Decimal>,
    pub precipitation_mm: Option<Decimal>,
    pub wind_max_kmh: Option<Decimal>,
}

/// Parallel daily columns as delivered by the forecast API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastColumns {
    pub dates: Vec<NaiveDate>,
    pub temp_max_celsius: Vec<Option<Decimal>>,
    pub temp_min_celsius: Vec<Option<Decimal>>,
    pub precipitation_mm: Vec<Option<Decimal>>,
    pub wind_max_kmh: Vec<Option<Decimal>>,
}

/// Daily forecast for one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastSeries {
    pub location: GpsCoordinates,
    pub days: Vec<DailyForecast>,
}

impl ForecastSeries {
    /// Zip parallel columns into daily records.
    ///
    /// Returns `None` when the series is empty or when dates, max/min
    /// temperature and precipitation differ in length. Wind is attached only
    /// when its column lines up with the dates. At most `horizon_days` days
    /// are kept.
    pub fn from_columns(
        location: GpsCoordinates,
        columns: ForecastColumns,
        horizon_days: usize,
    ) -> Option<Self> {
        let len = columns.dates.len();
        if len == 0
            || columns.temp_max_celsius.len() != len
            || columns.temp_min_celsius.len() != len
            || columns.precipitation_mm.len() != len
        {
            return None;
        }

        let wind = if columns.wind_max_kmh.len() == len {
            columns.wind_max_kmh
        } else {
            vec![None; len]
        };

        let days = columns
            .dates
            .into_iter()
            .zip(columns.temp_max_celsius)
            .zip(columns.temp_min_celsius)
            .zip(columns.precipitation_mm)
            .zip(wind)
            .take(horizon_days)
            .map(|((((date, tmax), tmin), rain), wind)| DailyForecast {
                date,
                temp_max_celsius: tmax,
                temp_min_celsius: tmin,
                precipitation_mm: rain,
                wind_max_kmh: wind,
            })
            .collect::<Vec<_>>();

        if days.is_empty() {
            return None;
        }

        Some(Self { location, days })
    }

    /// Whether the series spans the full requested horizon
    pub fn covers_horizon(&self, horizon_days: usize) -> bool {
        self.days.len() >= horizon_days
    }

    /// Precipitation values that are present, in day order
    pub fn valid_precipitation(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.days.iter().filter_map(|d| d.precipitation_mm)
    }

    /// Total of the present precipitation values and how many days had one
    pub fn precipitation_total(&self) -> Option<(Decimal, usize)> {
        let values: Vec<Decimal> = self.valid_precipitation().collect();
        if values.is_empty() {
            return None;
        }
        Some((values.iter().sum(), values.len()))
    }

    /// Mean of the present daily maximum temperatures
    pub fn mean_temp_max(&self) -> Option<Decimal> {
        let values: Vec<Decimal> = self.days.iter().filter_map(|d| d.temp_max_celsius).collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<Decimal>() / Decimal::from(values.len()))
    }

    pub fn summary(&self) -> ForecastSummary {
        ForecastSummary {
            mean_temp_max_celsius: self.mean_temp_max().map(|t| t.round_dp(1)),
            total_precipitation_mm: self.precipitation_total().map(|(total, _)| total.round_dp(1)),
        }
    }
}

/// Popup-level digest of a forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastSummary {
    pub mean_temp_max_celsius: Option<Decimal>,
    pub total_precipitation_mm: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(v: i64) -> Option<Decimal> {
        Some(Decimal::from(v))
    }

    fn location() -> GpsCoordinates {
        GpsCoordinates::new(Decimal::new(248607, 4), Decimal::new(670011, 4))
    }

    fn dates(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|d| NaiveDate::from_ymd_opt(2025, 7, d).unwrap())
            .collect()
    }

    #[test]
    fn test_from_columns_rejects_unequal_lengths() {
        let columns = ForecastColumns {
            dates: dates(7),
            temp_max_celsius: vec![dec(35); 7],
            temp_min_celsius: vec![dec(27); 7],
            precipitation_mm: vec![dec(1); 6],
            wind_max_kmh: vec![],
        };
        assert!(ForecastSeries::from_columns(location(), columns, 7).is_none());
    }

    #[test]
    fn test_from_columns_empty_is_absent() {
        assert!(ForecastSeries::from_columns(location(), ForecastColumns::default(), 7).is_none());
    }

    #[test]
    fn test_from_columns_truncates_and_drops_misaligned_wind() {
        let columns = ForecastColumns {
            dates: dates(9),
            temp_max_celsius: vec![dec(35); 9],
            temp_min_celsius: vec![dec(27); 9],
            precipitation_mm: vec![dec(2); 9],
            wind_max_kmh: vec![dec(10); 3],
        };
        let series = ForecastSeries::from_columns(location(), columns, 7).unwrap();
        assert_eq!(series.days.len(), 7);
        assert!(series.days.iter().all(|d| d.wind_max_kmh.is_none()));
    }

    #[test]
    fn test_precipitation_total_skips_missing_days() {
        let columns = ForecastColumns {
            dates: dates(3),
            temp_max_celsius: vec![dec(30), None, dec(34)],
            temp_min_celsius: vec![dec(20); 3],
            precipitation_mm: vec![dec(5), None, dec(7)],
            wind_max_kmh: vec![],
        };
        let series = ForecastSeries::from_columns(location(), columns, 7).unwrap();
        assert_eq!(series.precipitation_total(), Some((Decimal::from(12), 2)));
        assert_eq!(series.mean_temp_max(), Some(Decimal::from(32)));
    }

    #[test]
    fn test_precipitation_total_all_missing() {
        let columns = ForecastColumns {
            dates: dates(2),
            temp_max_celsius: vec![dec(30); 2],
            temp_min_celsius: vec![dec(20); 2],
            precipitation_mm: vec![None, None],
            wind_max_kmh: vec![],
        };
        let series = ForecastSeries::from_columns(location(), columns, 7).unwrap();
        assert_eq!(series.precipitation_total(), None);
        assert_eq!(series.summary().total_precipitation_mm, None);
    }

    #[test]
    fn test_short_series_is_kept() {
        let columns = ForecastColumns {
            dates: dates(3),
            temp_max_celsius: vec![dec(30); 3],
            temp_min_celsius: vec![dec(20); 3],
            precipitation_mm: vec![dec(4); 3],
            wind_max_kmh: vec![],
        };
        let series = ForecastSeries::from_columns(location(), columns, 7).unwrap();
        assert!(!series.covers_horizon(7));
        assert_eq!(series.precipitation_total(), Some((Decimal::from(12), 3)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Kept days are min(len, horizon); the horizon is covered iff len >= horizon
        #[test]
        fn prop_from_columns_horizon(len in 1u32..=16, horizon in 1usize..=10) {
            let n = len as usize;
            let columns = ForecastColumns {
                dates: dates(len),
                temp_max_celsius: vec![dec(33); n],
                temp_min_celsius: vec![dec(22); n],
                precipitation_mm: vec![dec(1); n],
                wind_max_kmh: vec![dec(9); n],
            };
            let series = ForecastSeries::from_columns(location(), columns, horizon).unwrap();
            prop_assert_eq!(series.days.len(), n.min(horizon));
            prop_assert_eq!(series.covers_horizon(horizon), n >= horizon);
        }
    }
}
