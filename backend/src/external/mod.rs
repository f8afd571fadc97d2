//! External API integrations

pub mod geospatial;
pub mod weather;

pub use geospatial::{AggregateProvider, GeospatialClient, ImageSpec, RegionQuery};
pub use weather::{ForecastClient, ForecastSource};
