//! Route definitions for the Sindh advisory dashboard

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/controls", get(handlers::get_controls))
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/sowing", get(handlers::get_sowing_advisory))
        .nest("/districts", district_routes())
        .route("/yields/:crop", get(handlers::get_yields))
}

/// Per-district routes
fn district_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_districts))
        .route("/:name/forecast", get(handlers::get_district_forecast))
        .route("/:name/advisories", get(handlers::get_district_advisories))
        .route("/:name/ndvi-trend", get(handlers::get_district_ndvi_trend))
}
