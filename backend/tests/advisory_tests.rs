//! Advisory engine integration tests
//!
//! Tests for the decision rules including:
//! - Sowing window classification
//! - Irrigation requirement against weekly crop need
//! - Flood risk threshold
//! - NDVI smoothing and normalization

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::advisory::{
    flood_risk_advisory, flood_risk_level, irrigation_advisory, irrigation_status,
    min_max_normalize, ndvi_trend, sowing_advisory, sowing_status, trailing_mean,
    AdvisoryThresholds, SowingCalendar,
};
use shared::advisory::ndvi::{FLAT_SERIES_NORMALIZED, FLAT_SPAN_TOLERANCE};
use shared::reference::{sindh_district_aliases, sindh_district_locations, sindh_reference_yields};
use shared::{
    Crop, DailyForecast, FloodRiskLevel, ForecastSeries, GpsCoordinates, IrrigationStatus,
    NdviSample, Severity, SowingStatus,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn forecast(rain: &[Option<Decimal>]) -> ForecastSeries {
    ForecastSeries {
        location: GpsCoordinates::new(dec("25.3960"), dec("68.3578")),
        days: rain
            .iter()
            .enumerate()
            .map(|(i, r)| DailyForecast {
                date: NaiveDate::from_ymd_opt(2025, 7, i as u32 + 1).unwrap(),
                temp_max_celsius: Some(dec("36.5")),
                temp_min_celsius: Some(dec("27.0")),
                precipitation_mm: *r,
                wind_max_kmh: Some(dec("18.0")),
            })
            .collect(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Wheat in November is inside its window
    #[test]
    fn test_wheat_in_november() {
        let advisory = sowing_advisory(&SowingCalendar::default(), Crop::Wheat, 11, 2025);
        assert_eq!(advisory.status, SowingStatus::InWindow);
        assert_eq!(advisory.severity, Severity::Info);
        assert!(advisory.message.contains("November 2025"));
    }

    /// Rice in March waits for June of the same year
    #[test]
    fn test_rice_in_march_is_upcoming() {
        let advisory = sowing_advisory(&SowingCalendar::default(), Crop::Rice, 3, 2025);
        assert_eq!(
            advisory.status,
            SowingStatus::UpcomingWindow {
                next_month: 6,
                next_year: 2025
            }
        );
        assert_eq!(advisory.severity, Severity::Warning);
        assert!(advisory.message.contains("June 2025"));
    }

    /// Cotton in August wraps to April of the next year
    #[test]
    fn test_cotton_in_august_wraps() {
        let advisory = sowing_advisory(&SowingCalendar::default(), Crop::Cotton, 8, 2025);
        assert_eq!(
            advisory.status,
            SowingStatus::WrapsToNextYear {
                next_month: 4,
                next_year: 2026
            }
        );
        assert_eq!(advisory.severity, Severity::Critical);
        assert!(advisory.message.contains("April 2026"));
    }

    /// Wheat with 20 mm of forecast rain needs irrigation
    #[test]
    fn test_wheat_twenty_mm_requires_irrigation() {
        let series = forecast(&[Some(dec("5")), Some(dec("5")), Some(dec("10"))]);
        let advisory = irrigation_advisory(
            "Hyderabad",
            Crop::Wheat,
            &series,
            &AdvisoryThresholds::default(),
        )
        .unwrap();
        assert_eq!(advisory.status, IrrigationStatus::IrrigationRequired);
        assert_eq!(advisory.total_rain_mm, dec("20"));
        assert_eq!(advisory.requirement_mm, dec("35"));
        assert_eq!(advisory.days_counted, 3);
    }

    /// Missing days are dropped from the total, not counted as zero
    #[test]
    fn test_missing_days_are_dropped() {
        let series = forecast(&[Some(dec("30")), None, Some(dec("12.5")), None]);
        let advisory = irrigation_advisory(
            "Sukkur",
            Crop::Wheat,
            &series,
            &AdvisoryThresholds::default(),
        )
        .unwrap();
        assert_eq!(advisory.total_rain_mm, dec("42.5"));
        assert_eq!(advisory.days_counted, 2);
        assert_eq!(advisory.status, IrrigationStatus::NoIrrigationNeeded);
    }

    /// No precipitation values at all produce no advisory
    #[test]
    fn test_no_rain_values_no_advisory() {
        let series = forecast(&[None, None, None]);
        let thresholds = AdvisoryThresholds::default();
        assert!(irrigation_advisory("Badin", Crop::Rice, &series, &thresholds).is_none());
        assert!(flood_risk_advisory("Badin", &series, &thresholds).is_none());
    }

    /// Flood threshold is exclusive
    #[test]
    fn test_flood_threshold_boundaries() {
        let threshold = dec("70");
        assert_eq!(flood_risk_level(dec("85"), threshold), FloodRiskLevel::HighRisk);
        assert_eq!(flood_risk_level(dec("70"), threshold), FloodRiskLevel::LowRisk);
        assert_eq!(flood_risk_level(dec("70.1"), threshold), FloodRiskLevel::HighRisk);
    }

    /// Smoothing window of three
    #[test]
    fn test_trailing_mean_matches_window() {
        let input = [0.2, 0.4, 0.6, 0.2];
        let out = trailing_mean(&input, 3);
        assert!((out[0] - 0.2).abs() < 1e-12);
        assert!((out[1] - 0.3).abs() < 1e-12);
        assert!((out[2] - 0.4).abs() < 1e-12);
        assert!((out[3] - 0.4).abs() < 1e-12);
    }

    /// A single sample is a degenerate series
    #[test]
    fn test_single_sample_trend() {
        let samples = [NdviSample {
            date: NaiveDate::from_ymd_opt(2025, 3, 6).unwrap(),
            raw: Some(3100.0),
        }];
        let trend = ndvi_trend(&samples);
        assert_eq!(trend.len(), 1);
        assert!((trend[0].ndvi - 0.31).abs() < 1e-12);
        assert_eq!(trend[0].normalized, 0.5);
    }

    /// Nawabshah joins the canonical tables
    #[test]
    fn test_nawabshah_alias_join() {
        let aliases = sindh_district_aliases();
        let canonical = aliases.resolve("Nawabshah");
        assert_eq!(canonical, "Shaheed Benazirabad");
        assert!(sindh_district_locations().get(canonical).is_some());
        assert_eq!(
            sindh_reference_yields().lookup(&aliases, Crop::Cotton, "Nawabshah"),
            Some(dec("2.3"))
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating calendar months
    fn month_strategy() -> impl Strategy<Value = u32> {
        1u32..=12u32
    }

    /// Strategy for generating non-empty sowing sets
    fn sowing_set_strategy() -> impl Strategy<Value = Vec<u32>> {
        prop::collection::vec(month_strategy(), 1..=4)
    }

    /// Strategy for generating daily rain amounts, some missing
    fn rain_strategy() -> impl Strategy<Value = Vec<Option<Decimal>>> {
        prop::collection::vec(
            prop::option::weighted(0.85, (0i64..=600i64).prop_map(|n| Decimal::new(n, 1))),
            1..=7,
        )
    }

    /// Strategy for generating NDVI-like series
    fn ndvi_strategy() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-0.2f64..1.0f64, 1..=24)
    }

    fn crop_strategy() -> impl Strategy<Value = Crop> {
        prop::sample::select(Crop::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// InWindow iff the month is a sowing month; otherwise the next month
        /// is the smallest greater member, or the cycle wraps to the smallest
        #[test]
        fn prop_sowing_status(months in sowing_set_strategy(), month in month_strategy(), year in 2020i32..2030i32) {
            let status = sowing_status(&months, month, year).unwrap();
            let min = *months.iter().min().unwrap();
            let next = months.iter().copied().filter(|m| *m > month).min();

            if months.contains(&month) {
                prop_assert_eq!(status, SowingStatus::InWindow);
            } else if let Some(next) = next {
                prop_assert_eq!(status, SowingStatus::UpcomingWindow { next_month: next, next_year: year });
            } else {
                prop_assert_eq!(status, SowingStatus::WrapsToNextYear { next_month: min, next_year: year + 1 });
            }
        }

        /// IrrigationRequired iff the sum of present values is below the need
        #[test]
        fn prop_irrigation_rule(rain in rain_strategy(), crop in crop_strategy()) {
            let thresholds = AdvisoryThresholds::default();
            let series = forecast(&rain);
            let present: Vec<Decimal> = rain.iter().flatten().copied().collect();

            match irrigation_advisory("Thatta", crop, &series, &thresholds) {
                None => prop_assert!(present.is_empty()),
                Some(advisory) => {
                    let total: Decimal = present.iter().sum();
                    prop_assert_eq!(advisory.total_rain_mm, total);
                    prop_assert_eq!(advisory.days_counted, present.len());
                    let required = total < thresholds.water_requirement(crop);
                    prop_assert_eq!(advisory.status == IrrigationStatus::IrrigationRequired, required);
                    prop_assert_eq!(irrigation_status(total, advisory.requirement_mm), advisory.status);
                }
            }
        }

        /// HighRisk iff the total strictly exceeds the threshold
        #[test]
        fn prop_flood_rule(rain in rain_strategy(), threshold in (0i64..=2000i64).prop_map(|n| Decimal::new(n, 1))) {
            let mut thresholds = AdvisoryThresholds::default();
            thresholds.flood_threshold_mm = threshold;
            let series = forecast(&rain);
            let present: Vec<Decimal> = rain.iter().flatten().copied().collect();

            match flood_risk_advisory("Badin", &series, &thresholds) {
                None => prop_assert!(present.is_empty()),
                Some(advisory) => {
                    let total: Decimal = present.iter().sum();
                    prop_assert_eq!(advisory.level == FloodRiskLevel::HighRisk, total > threshold);
                }
            }
        }

        /// Normalized values stay in [0, 1]; min maps to 0 and max to 1
        /// unless the series is flat, where everything is 0.5
        #[test]
        fn prop_normalize_bounds(values in ndvi_strategy()) {
            let out = min_max_normalize(&values);
            prop_assert_eq!(out.len(), values.len());
            prop_assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));

            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let magnitude = max.abs().max(min.abs()).max(1.0);
            if max - min > FLAT_SPAN_TOLERANCE * magnitude {
                let imin = values.iter().position(|v| *v == min).unwrap();
                let imax = values.iter().position(|v| *v == max).unwrap();
                prop_assert_eq!(out[imin], 0.0);
                prop_assert_eq!(out[imax], 1.0);
            } else {
                prop_assert!(out.iter().all(|v| *v == 0.5));
            }
        }

        /// Equal raw samples stay flat through smoothing
        #[test]
        fn prop_equal_samples_normalize_to_half(raw in 0u32..=10_000u32, n in 1usize..=24) {
            let samples: Vec<NdviSample> = (0..n)
                .map(|i| NdviSample {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(16 * i as u64),
                    raw: Some(raw as f64),
                })
                .collect();
            let trend = ndvi_trend(&samples);
            prop_assert_eq!(trend.len(), n);
            prop_assert!(trend.iter().all(|p| p.normalized == FLAT_SERIES_NORMALIZED));
        }

        /// out[0] = in[0], out[1] = mean(in[0..2]), out[i] = mean(in[i-2..=i])
        #[test]
        fn prop_trailing_mean_window(values in ndvi_strategy()) {
            let out = trailing_mean(&values, 3);
            prop_assert_eq!(out.len(), values.len());
            for i in 0..values.len() {
                let start = i.saturating_sub(2);
                let slice = &values[start..=i];
                let expected = slice.iter().sum::<f64>() / slice.len() as f64;
                prop_assert!((out[i] - expected).abs() < 1e-9);
            }
        }
    }
}
