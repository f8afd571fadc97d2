//! Reference yield handlers

use axum::{
    extract::{Path, State},
    Json,
};

use super::parse_crop;
use crate::error::AppResult;
use crate::services::dashboard::YieldChart;
use crate::AppState;

/// Reference yields for one crop, by district
pub async fn get_yields(
    State(state): State<AppState>,
    Path(crop): Path<String>,
) -> AppResult<Json<YieldChart>> {
    let crop = parse_crop(Some(&crop), shared::Crop::Wheat)?;
    Ok(Json(state.dashboard().yield_chart(crop)))
}
