//! Satellite overlay catalogue and legends

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{DateRange, OverlayKind, VisRange};

use crate::external::ImageSpec;

/// How an overlay's colour range is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisMode {
    /// 5th-95th percentile over the study region
    Dynamic,
    Fixed(VisRange),
}

/// Everything needed to build and colour one overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySpec {
    pub kind: OverlayKind,
    pub collection: &'static str,
    pub band: &'static str,
    /// Pixel size in metres for region statistics
    pub scale: f64,
    pub vis: VisMode,
    pub palette: &'static [&'static str],
    /// Baseline period for anomaly overlays
    pub baseline: Option<DateRange>,
    pub attribution: &'static str,
}

impl OverlaySpec {
    /// Image for the selected month
    pub fn image(&self, month: DateRange) -> ImageSpec {
        match self.baseline {
            Some(baseline) => ImageSpec::anomaly(self.collection, self.band, month, baseline),
            None => ImageSpec::composite(self.collection, self.band, month),
        }
    }
}

pub const NDVI_COLLECTION: &str = "MODIS/061/MOD13Q1";
pub const NDVI_BAND: &str = "NDVI";
pub const NDVI_SCALE_M: f64 = 500.0;

fn flood_baseline() -> Option<DateRange> {
    Some(DateRange {
        start: NaiveDate::from_ymd_opt(2001, 1, 1)?,
        end: NaiveDate::from_ymd_opt(2020, 12, 31)?,
    })
}

/// Catalogue entry for an overlay kind
pub fn overlay_spec(kind: OverlayKind) -> OverlaySpec {
    match kind {
        OverlayKind::Ndvi => OverlaySpec {
            kind,
            collection: NDVI_COLLECTION,
            band: NDVI_BAND,
            scale: NDVI_SCALE_M,
            vis: VisMode::Dynamic,
            palette: &["brown", "yellow", "green"],
            baseline: None,
            attribution: "MODIS NDVI",
        },
        OverlayKind::SoilMoisture => OverlaySpec {
            kind,
            collection: "ECMWF/ERA5_LAND/MONTHLY",
            band: "volumetric_soil_water_layer_1",
            scale: 10_000.0,
            vis: VisMode::Fixed(VisRange {
                min: 0.05,
                max: 0.45,
            }),
            palette: &["brown", "yellow", "green", "blue"],
            baseline: None,
            attribution: "ECMWF ERA5-Land",
        },
        OverlayKind::FloodAnomaly => OverlaySpec {
            kind,
            collection: "ECMWF/ERA5_LAND/MONTHLY_AGGR",
            band: "total_precipitation_sum",
            scale: 10_000.0,
            vis: VisMode::Dynamic,
            palette: &["blue", "white", "red"],
            baseline: flood_baseline(),
            attribution: "ECMWF ERA5",
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

/// Map legend for a single overlay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Legend {
    pub overlay: OverlayKind,
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

pub fn legend(kind: OverlayKind) -> Legend {
    let (title, entries): (&str, &[(&str, &str)]) = match kind {
        OverlayKind::Ndvi => (
            "NDVI",
            &[
                ("brown", "Low (0.0)"),
                ("yellow", "Medium (0.5)"),
                ("green", "High (0.9+)"),
            ],
        ),
        OverlayKind::SoilMoisture => (
            "Soil Moisture",
            &[
                ("brown", "Dry (0.05)"),
                ("yellow", "Moderate (0.2)"),
                ("lightgreen", "Moist (0.3)"),
                ("blue", "Saturated (0.45)"),
            ],
        ),
        OverlayKind::FloodAnomaly => (
            "Flood Anomaly",
            &[
                ("blue", "Wet (Excess Rain)"),
                ("white", "Normal"),
                ("red", "Dry (Deficit)"),
            ],
        ),
    };

    Legend {
        overlay: kind,
        title: title.to_string(),
        entries: entries
            .iter()
            .map(|(color, label)| LegendEntry {
                color: color.to_string(),
                label: label.to_string(),
            })
            .collect(),
    }
}
