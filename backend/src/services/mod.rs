//! Business logic services for the Sindh advisory dashboard

pub mod advisory;
pub mod dashboard;
pub mod forecast_cache;
pub mod overlay;

pub use advisory::Agronomy;
pub use dashboard::{DashboardService, DashboardView, ForecastChart};
pub use forecast_cache::ForecastCache;
