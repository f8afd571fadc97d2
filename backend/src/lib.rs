//! Sindh Crop & Weather Advisory Dashboard - backend library
//!
//! Serves a JSON dashboard combining satellite overlays, district forecasts
//! and crop advisories for the districts of Sindh.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod reference;
pub mod routes;
pub mod services;

pub use config::Config;

use external::{ForecastClient, GeospatialClient};
use reference::ReferenceData;
use services::{Agronomy, DashboardService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: Arc<ForecastClient>,
    pub geospatial: Arc<GeospatialClient>,
    pub reference: Arc<ReferenceData>,
    pub agronomy: Arc<Agronomy>,
}

impl AppState {
    /// Dashboard service borrowing this state's clients and reference data
    pub fn dashboard(&self) -> DashboardService<'_, ForecastClient, GeospatialClient> {
        DashboardService::new(
            self.weather.as_ref(),
            self.geospatial.as_ref(),
            self.reference.as_ref(),
            self.agronomy.as_ref(),
            self.config.geospatial.max_pixels,
        )
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Sindh Crop & Weather Advisory Dashboard API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
