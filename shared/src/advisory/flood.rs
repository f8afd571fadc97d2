//! Flood-risk advisory

use rust_decimal::Decimal;

use super::thresholds::AdvisoryThresholds;
use crate::models::{FloodRiskAdvisory, FloodRiskLevel, ForecastSeries, Severity};

/// High risk only when rainfall exceeds the threshold
pub fn flood_risk_level(total_rain_mm: Decimal, threshold_mm: Decimal) -> FloodRiskLevel {
    if total_rain_mm > threshold_mm {
        FloodRiskLevel::HighRisk
    } else {
        FloodRiskLevel::LowRisk
    }
}

/// Flood-risk advisory for one district's forecast; `None` without rain data
pub fn flood_risk_advisory(
    district: &str,
    forecast: &ForecastSeries,
    thresholds: &AdvisoryThresholds,
) -> Option<FloodRiskAdvisory> {
    let (total, days_counted) = forecast.precipitation_total()?;
    let threshold = thresholds.flood_threshold_mm;
    let level = flood_risk_level(total, threshold);

    let (severity, message) = match level {
        FloodRiskLevel::HighRisk => (
            Severity::Critical,
            format!(
                "High flood risk in {}. 7-day rainfall = {} mm (threshold = {} mm). \
                 Stay alert for possible waterlogging or flooding.",
                district,
                total.round_dp(1),
                threshold
            ),
        ),
        FloodRiskLevel::LowRisk => (
            Severity::Info,
            format!(
                "Low flood risk in {}. 7-day rainfall = {} mm.",
                district,
                total.round_dp(1)
            ),
        ),
    };

    Some(FloodRiskAdvisory {
        district: district.to_string(),
        level,
        total_rain_mm: total,
        threshold_mm: threshold,
        days_counted,
        severity,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_exclusive() {
        let threshold = Decimal::from(70);
        assert_eq!(flood_risk_level(Decimal::from(85), threshold), FloodRiskLevel::HighRisk);
        assert_eq!(flood_risk_level(Decimal::from(70), threshold), FloodRiskLevel::LowRisk);
        assert_eq!(
            flood_risk_level(Decimal::new(701, 1), threshold),
            FloodRiskLevel::HighRisk
        );
        assert_eq!(flood_risk_level(Decimal::ZERO, threshold), FloodRiskLevel::LowRisk);
    }
}
