//! Advisory models produced by the advisory engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Crop;

/// How prominently an advisory should be displayed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Where the current month sits relative to a crop's sowing months
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SowingStatus {
    InWindow,
    UpcomingWindow { next_month: u32, next_year: i32 },
    WrapsToNextYear { next_month: u32, next_year: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SowingAdvisory {
    pub crop: Crop,
    pub month: u32,
    pub year: i32,
    pub sowing_months: Vec<u32>,
    #[serde(flatten)]
    pub status: SowingStatus,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationStatus {
    IrrigationRequired,
    NoIrrigationNeeded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrrigationAdvisory {
    pub district: String,
    pub crop: Crop,
    pub status: IrrigationStatus,
    pub total_rain_mm: Decimal,
    pub requirement_mm: Decimal,
    /// Days whose precipitation value was present
    pub days_counted: usize,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FloodRiskLevel {
    HighRisk,
    LowRisk,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FloodRiskAdvisory {
    pub district: String,
    pub level: FloodRiskLevel,
    pub total_rain_mm: Decimal,
    pub threshold_mm: Decimal,
    pub days_counted: usize,
    pub severity: Severity,
    pub message: String,
}

/// Any advisory, tagged by kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvisoryResult {
    Sowing(SowingAdvisory),
    Irrigation(IrrigationAdvisory),
    FloodRisk(FloodRiskAdvisory),
}
