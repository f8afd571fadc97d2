//! HTTP handlers for per-district data

use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared::{validate_district_name, AdvisoryResult, Crop, DistrictSummary, NdviTrend, QueryOutcome};

use super::dashboard::CropQuery;
use super::{parse_crop, today};
use crate::error::{AppError, AppResult};
use crate::services::ForecastChart;
use crate::AppState;

fn checked_name(name: &str) -> AppResult<&str> {
    validate_district_name(name).map_err(|msg| AppError::field("name", msg))?;
    Ok(name.trim())
}

/// Remote outcomes that leave nothing to show
fn unavailable<T>(outcome: QueryOutcome<T>, what: &str) -> AppResult<T> {
    match outcome {
        QueryOutcome::Data(value) => Ok(value),
        QueryOutcome::Absent => Err(AppError::NotFound(what.to_string())),
        QueryOutcome::Failed(_) => Err(AppError::WeatherServiceUnavailable),
    }
}

/// List boundary districts with their canonical names and locations
pub async fn list_districts(State(state): State<AppState>) -> Json<Vec<DistrictSummary>> {
    Json(
        state
            .reference
            .districts
            .iter()
            .map(|d| d.summary())
            .collect(),
    )
}

/// 7-day forecast chart for a district
pub async fn get_district_forecast(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ForecastChart>> {
    let name = checked_name(&name)?;
    let outcome = state
        .dashboard()
        .district_forecast(name)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Forecast location for '{}'", name)))?;
    Ok(Json(unavailable(outcome, "Forecast")?))
}

/// Irrigation and flood-risk advisories for a district
pub async fn get_district_advisories(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<CropQuery>,
) -> AppResult<Json<Vec<AdvisoryResult>>> {
    let name = checked_name(&name)?;
    let crop = parse_crop(query.crop.as_deref(), Crop::Wheat)?;
    let outcome = state
        .dashboard()
        .district_advisories(name, crop)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Forecast location for '{}'", name)))?;
    Ok(Json(unavailable(outcome, "Forecast")?))
}

/// Normalized NDVI trend over the last twelve months
pub async fn get_district_ndvi_trend(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<NdviTrend>> {
    let name = checked_name(&name)?;
    let district = state
        .reference
        .find_district(name)
        .ok_or_else(|| AppError::NotFound(format!("District '{}'", name)))?;

    state
        .dashboard()
        .district_trend(district, today())
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("NDVI trend for '{}'", name)))
}
