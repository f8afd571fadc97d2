//! Irrigation-requirement advisory

use rust_decimal::Decimal;

use super::thresholds::AdvisoryThresholds;
use crate::models::{ForecastSeries, IrrigationAdvisory, IrrigationStatus, Severity};
use crate::types::Crop;

/// Required when forecast rainfall falls short of the crop's weekly need
pub fn irrigation_status(total_rain_mm: Decimal, requirement_mm: Decimal) -> IrrigationStatus {
    if total_rain_mm < requirement_mm {
        IrrigationStatus::IrrigationRequired
    } else {
        IrrigationStatus::NoIrrigationNeeded
    }
}

/// Irrigation advisory for one district's forecast.
///
/// Days without a precipitation value are dropped, so a partially missing
/// series may understate rainfall. Returns `None` when no day carries a value.
pub fn irrigation_advisory(
    district: &str,
    crop: Crop,
    forecast: &ForecastSeries,
    thresholds: &AdvisoryThresholds,
) -> Option<IrrigationAdvisory> {
    let (total, days_counted) = forecast.precipitation_total()?;
    let requirement = thresholds.water_requirement(crop);
    let status = irrigation_status(total, requirement);

    let (severity, message) = match status {
        IrrigationStatus::IrrigationRequired => (
            Severity::Warning,
            format!(
                "Irrigation required in {} for {}. Weekly rainfall = {} mm, crop need = {} mm.",
                district,
                crop,
                total.round_dp(1),
                requirement
            ),
        ),
        IrrigationStatus::NoIrrigationNeeded => (
            Severity::Info,
            format!(
                "No irrigation needed in {} for {}. Weekly rainfall = {} mm, crop need = {} mm.",
                district,
                crop,
                total.round_dp(1),
                requirement
            ),
        ),
    };

    Some(IrrigationAdvisory {
        district: district.to_string(),
        crop,
        status,
        total_rain_mm: total,
        requirement_mm: requirement,
        days_counted,
        severity,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ForecastColumns;
    use crate::types::GpsCoordinates;
    use chrono::NaiveDate;

    fn series(rain: &[Option<i64>]) -> ForecastSeries {
        let n = rain.len();
        let columns = ForecastColumns {
            dates: (0..n)
                .map(|i| NaiveDate::from_ymd_opt(2025, 8, 1 + i as u32).unwrap())
                .collect(),
            temp_max_celsius: vec![Some(Decimal::from(38)); n],
            temp_min_celsius: vec![Some(Decimal::from(28)); n],
            precipitation_mm: rain.iter().map(|r| r.map(Decimal::from)).collect(),
            wind_max_kmh: vec![],
        };
        ForecastSeries::from_columns(
            GpsCoordinates::new(Decimal::from(25), Decimal::from(68)),
            columns,
            7,
        )
        .unwrap()
    }

    #[test]
    fn test_wheat_needs_irrigation_with_20mm() {
        let forecast = series(&[Some(5), Some(5), Some(10), Some(0), Some(0), Some(0), Some(0)]);
        let advisory =
            irrigation_advisory("Sukkur", Crop::Wheat, &forecast, &AdvisoryThresholds::default())
                .unwrap();
        assert_eq!(advisory.status, IrrigationStatus::IrrigationRequired);
        assert_eq!(advisory.total_rain_mm, Decimal::from(20));
        assert_eq!(advisory.requirement_mm, Decimal::from(35));
        assert_eq!(advisory.days_counted, 7);
        assert_eq!(advisory.severity, Severity::Warning);
    }

    #[test]
    fn test_meeting_requirement_exactly_needs_no_irrigation() {
        let forecast = series(&[Some(35)]);
        let advisory =
            irrigation_advisory("Thatta", Crop::Wheat, &forecast, &AdvisoryThresholds::default())
                .unwrap();
        assert_eq!(advisory.status, IrrigationStatus::NoIrrigationNeeded);
    }

    #[test]
    fn test_missing_days_are_dropped() {
        let forecast = series(&[Some(30), None, Some(30), None]);
        let advisory =
            irrigation_advisory("Badin", Crop::Rice, &forecast, &AdvisoryThresholds::default())
                .unwrap();
        assert_eq!(advisory.total_rain_mm, Decimal::from(60));
        assert_eq!(advisory.days_counted, 2);
        assert_eq!(advisory.status, IrrigationStatus::NoIrrigationNeeded);
    }

    #[test]
    fn test_no_precipitation_values_no_advisory() {
        let forecast = series(&[None, None]);
        assert!(irrigation_advisory(
            "Badin",
            Crop::Rice,
            &forecast,
            &AdvisoryThresholds::default()
        )
        .is_none());
    }
}
