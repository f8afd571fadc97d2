//! HTTP handlers for the dashboard API

pub mod controls;
pub mod dashboard;
pub mod districts;
pub mod health;
pub mod yields;

pub use controls::get_controls;
pub use dashboard::{get_dashboard, get_sowing_advisory};
pub use districts::{get_district_advisories, get_district_forecast, get_district_ndvi_trend, list_districts};
pub use health::health_check;
pub use yields::get_yields;

use chrono::{Local, NaiveDate};
use shared::Crop;

use crate::error::{AppError, AppResult};

/// Server-local calendar date
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Crop from a query or path value; `default` when none was given
pub(crate) fn parse_crop(raw: Option<&str>, default: Crop) -> AppResult<Crop> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| AppError::UnknownCrop(value.trim().to_string())),
    }
}
