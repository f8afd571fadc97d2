//! Dashboard control options

use axum::{extract::State, Json};
use chrono::Datelike;
use serde::Serialize;
use shared::advisory::{month_name, AgronomyParameters};
use shared::{selectable_years, Crop, OverlayFlags, OverlayKind};

use super::today;
use crate::services::Agronomy;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CropOption {
    pub code: &'static str,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct MonthOption {
    pub value: u32,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OverlayOption {
    pub kind: OverlayKind,
    pub label: &'static str,
    pub enabled_by_default: bool,
}

/// Everything a client needs to draw the control sidebar
#[derive(Debug, Serialize)]
pub struct ControlsResponse {
    pub crops: Vec<CropOption>,
    pub years: Vec<i32>,
    pub months: Vec<MonthOption>,
    pub default_month: u32,
    pub overlays: Vec<OverlayOption>,
    /// Thresholds and calendar the server's advisories use
    pub agronomy: AgronomyParameters,
}

pub fn controls(start_year: i32, today: chrono::NaiveDate, agronomy: &Agronomy) -> ControlsResponse {
    let defaults = OverlayFlags::default();

    ControlsResponse {
        crops: Crop::ALL
            .iter()
            .map(|crop| CropOption {
                code: crop.code(),
                label: crop.to_string(),
            })
            .collect(),
        years: selectable_years(start_year, today.year()),
        months: (1..=12)
            .map(|value| MonthOption {
                value,
                name: month_name(value),
            })
            .collect(),
        default_month: today.month(),
        overlays: OverlayKind::ALL
            .iter()
            .map(|kind| OverlayOption {
                kind: *kind,
                label: kind.label(),
                enabled_by_default: defaults.is_enabled(*kind),
            })
            .collect(),
        agronomy: agronomy.parameters(),
    }
}

/// Get control options
pub async fn get_controls(State(state): State<AppState>) -> Json<ControlsResponse> {
    Json(controls(
        state.config.dashboard.start_year,
        today(),
        state.agronomy.as_ref(),
    ))
}
