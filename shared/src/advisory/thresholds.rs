//! Agronomic parameters the advisories are computed against

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Crop;

/// Errors building advisory parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("no sowing months configured for {0}")]
    EmptySowingWindow(Crop),

    #[error("invalid sowing month {month} for {crop}")]
    InvalidMonth { crop: Crop, month: u32 },

    #[error("missing water requirement for {0}")]
    MissingWaterRequirement(Crop),

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Crop → calendar months suitable for sowing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SowingCalendar {
    windows: BTreeMap<Crop, BTreeSet<u32>>,
}

impl SowingCalendar {
    /// Build a calendar; every crop needs at least one month in 1..=12
    pub fn new(windows: BTreeMap<Crop, Vec<u32>>) -> Result<Self, ReferenceError> {
        let mut checked = BTreeMap::new();
        for crop in Crop::ALL {
            let months = windows.get(&crop).cloned().unwrap_or_default();
            if months.is_empty() {
                return Err(ReferenceError::EmptySowingWindow(crop));
            }
            if let Some(month) = months.iter().find(|m| !(1..=12).contains(*m)) {
                return Err(ReferenceError::InvalidMonth {
                    crop,
                    month: *month,
                });
            }
            checked.insert(crop, months.into_iter().collect());
        }
        Ok(Self { windows: checked })
    }

    pub fn months(&self, crop: Crop) -> &BTreeSet<u32> {
        // Every crop is present after `new`
        &self.windows[&crop]
    }
}

impl Default for SowingCalendar {
    fn default() -> Self {
        let windows = BTreeMap::from([
            (Crop::Wheat, BTreeSet::from([11, 12])),
            (Crop::Rice, BTreeSet::from([6, 7])),
            (Crop::Cotton, BTreeSet::from([4, 5])),
            (Crop::Sugarcane, BTreeSet::from([2, 3])),
        ]);
        Self { windows }
    }
}

/// Rainfall thresholds for the irrigation and flood advisories
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdvisoryThresholds {
    /// 7-day rainfall above which flood risk is high (exclusive)
    pub flood_threshold_mm: Decimal,
    /// Weekly crop water requirement
    water_requirement_mm: BTreeMap<Crop, Decimal>,
}

impl AdvisoryThresholds {
    pub fn new(
        flood_threshold_mm: Decimal,
        water_requirement_mm: BTreeMap<Crop, Decimal>,
    ) -> Result<Self, ReferenceError> {
        if flood_threshold_mm < Decimal::ZERO {
            return Err(ReferenceError::InvalidValue {
                field: "flood_threshold_mm".to_string(),
                value: flood_threshold_mm.to_string(),
            });
        }
        for crop in Crop::ALL {
            match water_requirement_mm.get(&crop) {
                None => return Err(ReferenceError::MissingWaterRequirement(crop)),
                Some(value) if *value < Decimal::ZERO => {
                    return Err(ReferenceError::InvalidValue {
                        field: format!("water_requirement_mm.{}", crop.code()),
                        value: value.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(Self {
            flood_threshold_mm,
            water_requirement_mm,
        })
    }

    pub fn water_requirement(&self, crop: Crop) -> Decimal {
        self.water_requirement_mm[&crop]
    }
}

impl Default for AdvisoryThresholds {
    fn default() -> Self {
        Self {
            flood_threshold_mm: Decimal::from(70),
            water_requirement_mm: BTreeMap::from([
                (Crop::Wheat, Decimal::from(35)),
                (Crop::Rice, Decimal::from(50)),
                (Crop::Cotton, Decimal::from(40)),
                (Crop::Sugarcane, Decimal::from(55)),
            ]),
        }
    }
}

/// Wire form of the active thresholds and calendar.
///
/// The server publishes it so browser-side recomputation uses the same
/// parameters as the rendered dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgronomyParameters {
    pub flood_threshold_mm: Decimal,
    pub water_requirement_mm: BTreeMap<Crop, Decimal>,
    pub sowing_months: BTreeMap<Crop, Vec<u32>>,
}

impl AgronomyParameters {
    pub fn from_parts(thresholds: &AdvisoryThresholds, calendar: &SowingCalendar) -> Self {
        Self {
            flood_threshold_mm: thresholds.flood_threshold_mm,
            water_requirement_mm: thresholds.water_requirement_mm.clone(),
            sowing_months: calendar
                .windows
                .iter()
                .map(|(crop, months)| (*crop, months.iter().copied().collect()))
                .collect(),
        }
    }

    /// Validate back into engine parameters
    pub fn into_parts(self) -> Result<(AdvisoryThresholds, SowingCalendar), ReferenceError> {
        let thresholds = AdvisoryThresholds::new(self.flood_threshold_mm, self.water_requirement_mm)?;
        let calendar = SowingCalendar::new(self.sowing_months)?;
        Ok((thresholds, calendar))
    }
}

impl Default for AgronomyParameters {
    fn default() -> Self {
        Self::from_parts(&AdvisoryThresholds::default(), &SowingCalendar::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_calendar() {
        let calendar = SowingCalendar::default();
        assert_eq!(
            calendar.months(Crop::Wheat).iter().copied().collect::<Vec<_>>(),
            vec![11, 12]
        );
    }

    #[test]
    fn test_calendar_rejects_empty_and_invalid_months() {
        let mut windows: BTreeMap<Crop, Vec<u32>> =
            Crop::ALL.into_iter().map(|c| (c, vec![1])).collect();
        windows.insert(Crop::Rice, vec![]);
        assert_eq!(
            SowingCalendar::new(windows.clone()),
            Err(ReferenceError::EmptySowingWindow(Crop::Rice))
        );

        windows.insert(Crop::Rice, vec![13]);
        assert_eq!(
            SowingCalendar::new(windows),
            Err(ReferenceError::InvalidMonth {
                crop: Crop::Rice,
                month: 13
            })
        );
    }

    #[test]
    fn test_thresholds_require_every_crop() {
        let partial = BTreeMap::from([(Crop::Wheat, Decimal::from(35))]);
        assert_eq!(
            AdvisoryThresholds::new(Decimal::from(70), partial),
            Err(ReferenceError::MissingWaterRequirement(Crop::Rice))
        );
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = AdvisoryThresholds::default();
        assert_eq!(thresholds.flood_threshold_mm, Decimal::from(70));
        assert_eq!(thresholds.water_requirement(Crop::Sugarcane), Decimal::from(55));
    }

    #[test]
    fn test_parameters_round_trip_through_validation() {
        let params = AgronomyParameters::default();
        assert_eq!(params.sowing_months[&Crop::Rice], vec![6, 7]);
        let (thresholds, calendar) = params.into_parts().unwrap();
        assert_eq!(thresholds, AdvisoryThresholds::default());
        assert_eq!(calendar, SowingCalendar::default());
    }

    #[test]
    fn test_parameters_reject_invalid_months() {
        let mut params = AgronomyParameters::default();
        params.sowing_months.insert(Crop::Cotton, vec![0]);
        assert_eq!(
            params.into_parts().err(),
            Some(ReferenceError::InvalidMonth {
                crop: Crop::Cotton,
                month: 0
            })
        );
    }
}
