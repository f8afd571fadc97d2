//! Remote query outcomes and raster aggregate models

use serde::{Deserialize, Serialize};

/// Result of a remote query.
///
/// `Absent` means the service answered but had nothing (no valid pixels, no
/// `daily` block); `Failed` means the query itself went wrong.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum QueryOutcome<T> {
    Data(T),
    Absent,
    Failed(String),
}

impl<T> QueryOutcome<T> {
    pub fn data(self) -> Option<T> {
        match self {
            QueryOutcome::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryOutcome<U> {
        match self {
            QueryOutcome::Data(value) => QueryOutcome::Data(f(value)),
            QueryOutcome::Absent => QueryOutcome::Absent,
            QueryOutcome::Failed(reason) => QueryOutcome::Failed(reason),
        }
    }

    /// Turn `Data(None)` into `Absent`
    pub fn and_then_option<U>(self, f: impl FnOnce(T) -> Option<U>) -> QueryOutcome<U> {
        match self {
            QueryOutcome::Data(value) => match f(value) {
                Some(mapped) => QueryOutcome::Data(mapped),
                None => QueryOutcome::Absent,
            },
            QueryOutcome::Absent => QueryOutcome::Absent,
            QueryOutcome::Failed(reason) => QueryOutcome::Failed(reason),
        }
    }

    /// Short note for popups when there is no data
    pub fn unavailable_note(&self) -> Option<String> {
        match self {
            QueryOutcome::Data(_) => None,
            QueryOutcome::Absent => Some("data unavailable".to_string()),
            QueryOutcome::Failed(reason) => Some(format!("query failed: {}", reason)),
        }
    }
}

/// Reduction applied over a polygon
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reducer {
    Mean,
    /// 5th and 95th percentile
    Percentile5_95,
}

/// A raster band reduced over one polygon
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionalAggregate {
    Mean { value: f64 },
    Range { p5: f64, p95: f64 },
}

impl RegionalAggregate {
    pub fn mean(&self) -> Option<f64> {
        match self {
            RegionalAggregate::Mean { value } => Some(*value),
            RegionalAggregate::Range { .. } => None,
        }
    }
}

/// Value range used to colour an overlay
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VisRange {
    pub min: f64,
    pub max: f64,
}

impl VisRange {
    pub const UNIT: VisRange = VisRange { min: 0.0, max: 1.0 };

    /// Range from a percentile aggregate; unit range when absent, failed or flat
    pub fn from_percentiles(outcome: &QueryOutcome<RegionalAggregate>) -> Self {
        match outcome {
            QueryOutcome::Data(RegionalAggregate::Range { p5, p95 })
                if p5.is_finite() && p95.is_finite() && p5 != p95 =>
            {
                VisRange {
                    min: *p5,
                    max: *p95,
                }
            }
            _ => VisRange::UNIT,
        }
    }
}

/// Full visualization parameters for an overlay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisParams {
    pub min: f64,
    pub max: f64,
    pub palette: Vec<String>,
}

impl VisParams {
    pub fn new(range: VisRange, palette: &[&str]) -> Self {
        Self {
            min: range.min,
            max: range.max,
            palette: palette.iter().map(|c| c.to_string()).collect(),
        }
    }
}
