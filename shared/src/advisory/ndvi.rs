//! NDVI trend smoothing and normalization

use chrono::{Months, NaiveDate};

use crate::models::{NdviSample, NdviTrendPoint};
use crate::types::DateRange;

/// MODIS stores NDVI as an integer scaled by this factor
pub const NDVI_SCALE: f64 = 10_000.0;

/// Samples in the trailing moving average
pub const SMOOTHING_WINDOW: usize = 3;

/// Normalized value emitted for every point of a flat series
pub const FLAT_SERIES_NORMALIZED: f64 = 0.5;

/// Relative span below which a series counts as flat. Smoothing leaves a few
/// ulps of drift on equal inputs.
pub const FLAT_SPAN_TOLERANCE: f64 = 1e-9;

/// Convert a stored NDVI value to the index scale
pub fn scale_ndvi(raw: f64) -> f64 {
    raw / NDVI_SCALE
}

/// Trailing mean over up to `window` values ending at each position
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Min-max scale to [0, 1]; a flat series maps to [`FLAT_SERIES_NORMALIZED`]
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let magnitude = max.abs().max(min.abs()).max(1.0);

    if !(span > FLAT_SPAN_TOLERANCE * magnitude) {
        return vec![FLAT_SERIES_NORMALIZED; values.len()];
    }

    values
        .iter()
        .map(|v| ((v - min) / span).clamp(0.0, 1.0))
        .collect()
}

/// Build a district's NDVI trend from raw composite samples.
///
/// Absent and non-finite samples are dropped, the rest scaled, sorted by
/// date, smoothed and normalized. An empty result means the district has no
/// usable data.
pub fn ndvi_trend(samples: &[NdviSample]) -> Vec<NdviTrendPoint> {
    let mut valid: Vec<(NaiveDate, f64)> = samples
        .iter()
        .filter_map(|s| match s.raw {
            Some(raw) if raw.is_finite() => Some((s.date, scale_ndvi(raw))),
            _ => None,
        })
        .collect();
    valid.sort_by_key(|(date, _)| *date);

    let ndvi: Vec<f64> = valid.iter().map(|(_, v)| *v).collect();
    let smoothed = trailing_mean(&ndvi, SMOOTHING_WINDOW);
    let normalized = min_max_normalize(&smoothed);

    valid
        .into_iter()
        .zip(smoothed)
        .zip(normalized)
        .map(|(((date, ndvi), smoothed), normalized)| NdviTrendPoint {
            date,
            ndvi,
            smoothed,
            normalized,
        })
        .collect()
}

/// The trailing twelve months ending at `today` (exclusive)
pub fn trend_window(today: NaiveDate) -> DateRange {
    let start = today
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);
    DateRange { start, end: today }
}
