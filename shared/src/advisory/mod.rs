//! Advisory engine
//!
//! Pure functions turning forecasts and satellite aggregates into decisions:
//! sowing timing, irrigation need, flood risk and NDVI trend normalization.

pub mod flood;
pub mod irrigation;
pub mod ndvi;
pub mod sowing;
pub mod thresholds;

pub use flood::{flood_risk_advisory, flood_risk_level};
pub use irrigation::{irrigation_advisory, irrigation_status};
pub use ndvi::{min_max_normalize, ndvi_trend, scale_ndvi, trailing_mean, trend_window};
pub use sowing::{month_name, sowing_advisory, sowing_status};
pub use thresholds::{AdvisoryThresholds, AgronomyParameters, ReferenceError, SowingCalendar};
