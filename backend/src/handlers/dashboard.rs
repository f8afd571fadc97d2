//! HTTP handlers for the dashboard render and sowing advisory

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Datelike;
use serde::Deserialize;
use shared::{validate_year, Crop, DashboardRequest, OverlayFlags, SowingAdvisory};
use validator::Validate;

use super::{parse_crop, today};
use crate::error::{AppError, AppResult};
use crate::services::DashboardView;
use crate::AppState;

/// Sidebar controls as query parameters
#[derive(Debug, Default, Deserialize, Validate)]
pub struct DashboardQuery {
    pub crop: Option<String>,
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<u32>,
    pub ndvi: Option<bool>,
    pub soil_moisture: Option<bool>,
    pub flood_anomaly: Option<bool>,
}

impl DashboardQuery {
    /// Validate and fill defaults: first crop, first selectable year,
    /// current month, NDVI only
    pub fn into_request(self, start_year: i32, today: chrono::NaiveDate) -> AppResult<DashboardRequest> {
        self.validate()?;

        let crop = parse_crop(self.crop.as_deref(), Crop::Wheat)?;
        let year = self.year.unwrap_or(start_year);
        validate_year(year, start_year, today.year()).map_err(|msg| AppError::field("year", msg))?;

        let defaults = OverlayFlags::default();
        Ok(DashboardRequest {
            crop,
            year,
            month: self.month.unwrap_or_else(|| today.month()),
            overlays: OverlayFlags {
                ndvi: self.ndvi.unwrap_or(defaults.ndvi),
                soil_moisture: self.soil_moisture.unwrap_or(defaults.soil_moisture),
                flood_anomaly: self.flood_anomaly.unwrap_or(defaults.flood_anomaly),
            },
            today,
        })
    }
}

/// Render the dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardView>> {
    let request = query.into_request(state.config.dashboard.start_year, today())?;
    tracing::info!(
        crop = %request.crop,
        year = request.year,
        month = request.month,
        "Rendering dashboard"
    );
    let view = state.dashboard().render(&request).await;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct CropQuery {
    pub crop: Option<String>,
}

/// Sowing advisory for today's month
pub async fn get_sowing_advisory(
    State(state): State<AppState>,
    Query(query): Query<CropQuery>,
) -> AppResult<Json<SowingAdvisory>> {
    let crop = parse_crop(query.crop.as_deref(), Crop::Wheat)?;
    Ok(Json(state.dashboard().sowing(crop, today())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_defaults() {
        let request = DashboardQuery::default().into_request(2020, today()).unwrap();
        assert_eq!(request.crop, Crop::Wheat);
        assert_eq!(request.year, 2020);
        assert_eq!(request.month, 10);
        assert_eq!(request.overlays, OverlayFlags::default());
    }

    #[test]
    fn test_rejects_bad_month_and_year() {
        let query = DashboardQuery {
            month: Some(13),
            ..Default::default()
        };
        assert!(matches!(
            query.into_request(2020, today()),
            Err(AppError::Validation { .. })
        ));

        let query = DashboardQuery {
            year: Some(2027),
            ..Default::default()
        };
        match query.into_request(2020, today()) {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "year"),
            other => panic!("unexpected {:?}", other.map(|r| r.year)),
        }
    }

    #[test]
    fn test_overlay_flags_from_query() {
        let query = DashboardQuery {
            crop: Some("cotton".into()),
            ndvi: Some(false),
            flood_anomaly: Some(true),
            ..Default::default()
        };
        let request = query.into_request(2020, today()).unwrap();
        assert_eq!(request.crop, Crop::Cotton);
        assert!(!request.overlays.ndvi);
        assert!(request.overlays.flood_anomaly);
        assert!(!request.overlays.soil_moisture);
    }
}
