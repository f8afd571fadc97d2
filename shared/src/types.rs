//! Common types used across the dashboard

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Crops offered by the crop selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Wheat,
    Rice,
    Cotton,
    Sugarcane,
}

impl Crop {
    pub const ALL: [Crop; 4] = [Crop::Wheat, Crop::Rice, Crop::Cotton, Crop::Sugarcane];

    pub fn code(&self) -> &'static str {
        match self {
            Crop::Wheat => "wheat",
            Crop::Rice => "rice",
            Crop::Cotton => "cotton",
            Crop::Sugarcane => "sugarcane",
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Crop::Wheat => "Wheat",
            Crop::Rice => "Rice",
            Crop::Cotton => "Cotton",
            Crop::Sugarcane => "Sugarcane",
        };
        f.write_str(name)
    }
}

impl FromStr for Crop {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Crop::ALL
            .into_iter()
            .find(|crop| crop.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown crop '{}'", wanted))
    }
}

/// Satellite overlays that can be toggled on the map
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    Ndvi,
    SoilMoisture,
    FloodAnomaly,
}

impl OverlayKind {
    /// Legend priority order: the first enabled overlay owns the legend
    pub const ALL: [OverlayKind; 3] = [
        OverlayKind::Ndvi,
        OverlayKind::SoilMoisture,
        OverlayKind::FloodAnomaly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OverlayKind::Ndvi => "NDVI Vegetation",
            OverlayKind::SoilMoisture => "Soil Moisture",
            OverlayKind::FloodAnomaly => "Flood Anomaly",
        }
    }
}

/// Overlay toggles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverlayFlags {
    pub ndvi: bool,
    pub soil_moisture: bool,
    pub flood_anomaly: bool,
}

impl Default for OverlayFlags {
    fn default() -> Self {
        Self {
            ndvi: true,
            soil_moisture: false,
            flood_anomaly: false,
        }
    }
}

impl OverlayFlags {
    pub fn is_enabled(&self, kind: OverlayKind) -> bool {
        match kind {
            OverlayKind::Ndvi => self.ndvi,
            OverlayKind::SoilMoisture => self.soil_moisture,
            OverlayKind::FloodAnomaly => self.flood_anomaly,
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = OverlayKind> + '_ {
        OverlayKind::ALL
            .into_iter()
            .filter(move |kind| self.is_enabled(*kind))
    }

    /// Overlay whose legend is shown; NDVI when nothing is enabled
    pub fn legend_overlay(&self) -> OverlayKind {
        self.enabled().next().unwrap_or(OverlayKind::Ndvi)
    }
}

/// Everything one dashboard render depends on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardRequest {
    pub crop: Crop,
    pub year: i32,
    pub month: u32,
    pub overlays: OverlayFlags,
    /// Date the sowing advisory and NDVI trend window are anchored to
    pub today: NaiveDate,
}

impl DashboardRequest {
    /// Half-open date range covering the selected month
    pub fn month_range(&self) -> Option<DateRange> {
        DateRange::month(self.year, self.month)
    }
}

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Range covering one calendar month
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start.checked_add_months(Months::new(1))?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn label(&self) -> String {
        format!("{}-{:02}", self.start.year(), self.start.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_parsing_is_case_insensitive() {
        assert_eq!("Wheat".parse::<Crop>(), Ok(Crop::Wheat));
        assert_eq!(" SUGARCANE ".parse::<Crop>(), Ok(Crop::Sugarcane));
        assert!("maize".parse::<Crop>().is_err());
    }

    #[test]
    fn test_legend_overlay_priority() {
        let flags = OverlayFlags {
            ndvi: false,
            soil_moisture: true,
            flood_anomaly: true,
        };
        assert_eq!(flags.legend_overlay(), OverlayKind::SoilMoisture);

        let none = OverlayFlags {
            ndvi: false,
            soil_moisture: false,
            flood_anomaly: false,
        };
        assert_eq!(none.legend_overlay(), OverlayKind::Ndvi);
        assert_eq!(none.enabled().count(), 0);
    }

    #[test]
    fn test_month_range_december() {
        let range = DateRange::month(2024, 12).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!range.contains(range.end));
        assert_eq!(range.label(), "2024-12");
    }

    #[test]
    fn test_month_range_invalid_month() {
        assert!(DateRange::month(2024, 13).is_none());
        assert!(DateRange::month(2024, 0).is_none());
    }
}
