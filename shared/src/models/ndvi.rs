//! NDVI time-series models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One composite's district-mean NDVI as stored by MODIS (scaled by 10000)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NdviSample {
    pub date: NaiveDate,
    pub raw: Option<f64>,
}

/// A point of a district's NDVI trend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NdviTrendPoint {
    pub date: NaiveDate,
    /// Index value (raw / 10000)
    pub ndvi: f64,
    /// Trailing 3-sample mean of `ndvi`
    pub smoothed: f64,
    /// `smoothed` min-max scaled to [0, 1] within the district
    pub normalized: f64,
}

/// Trend for one district
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NdviTrend {
    pub district: String,
    pub points: Vec<NdviTrendPoint>,
}
