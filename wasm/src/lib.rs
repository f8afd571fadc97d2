//! WebAssembly module for the Sindh advisory dashboard
//!
//! Runs the advisory engine in the browser so the sidebar can update
//! without a server round trip. Exports taking `parameters_json` expect the
//! `agronomy` object from `/api/v1/controls`; an empty string selects the
//! reference defaults.
//! - Sowing window advisory
//! - Irrigation and flood-risk advisories from a forecast
//! - NDVI trend smoothing and normalization

use rust_decimal::Decimal;
use serde::Serialize;
use shared::advisory::{
    flood_risk_advisory, flood_risk_level, irrigation_advisory, ndvi_trend, sowing_advisory,
    AdvisoryThresholds, AgronomyParameters, SowingCalendar,
};
use shared::reference::sindh_district_aliases;
use shared::{Crop, ForecastSeries, NdviSample};
use wasm_bindgen::prelude::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("agri-dashboard wasm ready"));
}

fn to_js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

fn parse_crop(crop: &str) -> Result<Crop, JsValue> {
    crop.parse().map_err(|e: String| JsValue::from_str(&e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| to_js_error("Serialization failed", e))
}

fn parameters(parameters_json: &str) -> Result<(AdvisoryThresholds, SowingCalendar), JsValue> {
    if parameters_json.trim().is_empty() {
        return Ok((AdvisoryThresholds::default(), SowingCalendar::default()));
    }
    let params: AgronomyParameters = serde_json::from_str(parameters_json)
        .map_err(|e| to_js_error("Invalid agronomy parameters JSON", e))?;
    params
        .into_parts()
        .map_err(|e| to_js_error("Invalid agronomy parameters", e))
}

/// Sowing advisory as JSON for an explicit month and year
#[wasm_bindgen]
pub fn sowing_advisory_json(
    crop: &str,
    month: u32,
    year: i32,
    parameters_json: &str,
) -> Result<String, JsValue> {
    if shared::validate_month(month).is_err() {
        return Err(JsValue::from_str("Month must be between 1 and 12"));
    }
    let (_, calendar) = parameters(parameters_json)?;
    let advisory = sowing_advisory(&calendar, parse_crop(crop)?, month, year);
    to_json(&advisory)
}

/// Sowing advisory for the browser's current date
#[wasm_bindgen]
pub fn sowing_advisory_today(crop: &str, parameters_json: &str) -> Result<String, JsValue> {
    let now = js_sys::Date::new_0();
    // JS months are zero-based
    let month = now.get_month() + 1;
    let year = now.get_full_year() as i32;
    sowing_advisory_json(crop, month, year, parameters_json)
}

/// Irrigation advisory for a forecast given as `ForecastSeries` JSON.
/// Returns `null` JSON when the forecast has no precipitation values.
#[wasm_bindgen]
pub fn irrigation_advisory_json(
    district: &str,
    crop: &str,
    forecast_json: &str,
    parameters_json: &str,
) -> Result<String, JsValue> {
    let forecast: ForecastSeries =
        serde_json::from_str(forecast_json).map_err(|e| to_js_error("Invalid forecast JSON", e))?;
    let (thresholds, _) = parameters(parameters_json)?;
    let advisory = irrigation_advisory(district, parse_crop(crop)?, &forecast, &thresholds);
    to_json(&advisory)
}

/// Flood-risk advisory for a forecast given as `ForecastSeries` JSON
#[wasm_bindgen]
pub fn flood_risk_advisory_json(
    district: &str,
    forecast_json: &str,
    parameters_json: &str,
) -> Result<String, JsValue> {
    let forecast: ForecastSeries =
        serde_json::from_str(forecast_json).map_err(|e| to_js_error("Invalid forecast JSON", e))?;
    let (thresholds, _) = parameters(parameters_json)?;
    to_json(&flood_risk_advisory(district, &forecast, &thresholds))
}

/// Whether a 7-day rainfall total is a high flood risk
#[wasm_bindgen]
pub fn is_high_flood_risk(total_rain_mm: f64, threshold_mm: f64) -> bool {
    match (Decimal::try_from(total_rain_mm), Decimal::try_from(threshold_mm)) {
        (Ok(total), Ok(threshold)) => {
            flood_risk_level(total, threshold) == shared::FloodRiskLevel::HighRisk
        }
        _ => false,
    }
}

/// NDVI trend from `[{date, raw}]` JSON samples
#[wasm_bindgen]
pub fn ndvi_trend_json(samples_json: &str) -> Result<String, JsValue> {
    let samples: Vec<NdviSample> =
        serde_json::from_str(samples_json).map_err(|e| to_js_error("Invalid NDVI samples JSON", e))?;
    to_json(&ndvi_trend(&samples))
}

/// Canonical spelling of a Sindh district name
#[wasm_bindgen]
pub fn canonical_district(name: &str) -> String {
    sindh_district_aliases().resolve(name).to_string()
}
