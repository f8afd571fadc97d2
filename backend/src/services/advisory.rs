//! Advisory assembly for districts

use shared::advisory::{
    flood_risk_advisory, irrigation_advisory, sowing_advisory, AdvisoryThresholds,
    AgronomyParameters, ReferenceError, SowingCalendar,
};
use shared::{AdvisoryResult, Crop, ForecastSeries, SowingAdvisory};

use crate::config::AgronomyConfig;

/// Validated agronomic parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Agronomy {
    pub thresholds: AdvisoryThresholds,
    pub calendar: SowingCalendar,
}

impl Agronomy {
    pub fn from_config(config: &AgronomyConfig) -> Result<Self, ReferenceError> {
        Ok(Self {
            thresholds: config.thresholds()?,
            calendar: config.sowing_calendar()?,
        })
    }

    /// Active parameters in their published form
    pub fn parameters(&self) -> AgronomyParameters {
        AgronomyParameters::from_parts(&self.thresholds, &self.calendar)
    }

    pub fn sowing(&self, crop: Crop, month: u32, year: i32) -> SowingAdvisory {
        sowing_advisory(&self.calendar, crop, month, year)
    }

    /// Irrigation then flood-risk advisory for one district's forecast.
    /// Empty when the forecast carries no precipitation values.
    pub fn forecast_advisories(
        &self,
        district: &str,
        crop: Crop,
        forecast: &ForecastSeries,
    ) -> Vec<AdvisoryResult> {
        let irrigation = irrigation_advisory(district, crop, forecast, &self.thresholds)
            .map(AdvisoryResult::Irrigation);
        let flood =
            flood_risk_advisory(district, forecast, &self.thresholds).map(AdvisoryResult::FloodRisk);

        irrigation.into_iter().chain(flood).collect()
    }
}
