//! Configuration management for the Sindh advisory dashboard
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRI_ prefix

use std::collections::BTreeMap;

use config::{ConfigError, Environment, File};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::advisory::{AdvisoryThresholds, ReferenceError, SowingCalendar};
use shared::Crop;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Forecast API configuration
    pub weather: WeatherConfig,

    /// Geospatial analysis gateway configuration
    pub geospatial: GeospatialConfig,

    /// Static reference inputs
    pub reference: ReferenceConfig,

    /// Dashboard controls
    pub dashboard: DashboardConfig,

    /// Advisory thresholds and calendars
    #[serde(default)]
    pub agronomy: AgronomyConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Forecast API base URL (Open-Meteo compatible)
    pub api_endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Days requested and kept per forecast
    pub forecast_days: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeospatialConfig {
    /// Analysis gateway base URL
    pub endpoint: String,

    /// Gateway API key
    pub api_key: String,

    /// Cloud project the gateway session runs under
    pub project_id: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Pixel budget per reduction
    pub max_pixels: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReferenceConfig {
    /// District boundary GeoJSON (FeatureCollection)
    pub boundaries_path: String,

    /// Feature property holding the district name
    pub name_property: String,

    /// Optional river overlay GeoJSON
    pub river_path: Option<String>,

    /// Optional CSV replacing the built-in yield table
    pub yields_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// First year offered by the year selector
    pub start_year: i32,
}

/// Agronomic parameters; every field defaults to the reference values
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgronomyConfig {
    /// 7-day rainfall (mm) above which flood risk is high
    pub flood_threshold_mm: f64,

    /// Weekly water requirement (mm) per crop
    pub water_requirement_mm: BTreeMap<Crop, f64>,

    /// Sowing months per crop
    pub sowing_months: BTreeMap<Crop, Vec<u32>>,
}

impl Default for AgronomyConfig {
    fn default() -> Self {
        Self {
            flood_threshold_mm: 70.0,
            water_requirement_mm: BTreeMap::from([
                (Crop::Wheat, 35.0),
                (Crop::Rice, 50.0),
                (Crop::Cotton, 40.0),
                (Crop::Sugarcane, 55.0),
            ]),
            sowing_months: BTreeMap::from([
                (Crop::Wheat, vec![11, 12]),
                (Crop::Rice, vec![6, 7]),
                (Crop::Cotton, vec![4, 5]),
                (Crop::Sugarcane, vec![2, 3]),
            ]),
        }
    }
}

impl AgronomyConfig {
    pub fn thresholds(&self) -> Result<AdvisoryThresholds, ReferenceError> {
        let flood = to_decimal("flood_threshold_mm", self.flood_threshold_mm)?;
        // Crops left out of the override keep their reference value
        let mut merged = AgronomyConfig::default().water_requirement_mm;
        merged.extend(self.water_requirement_mm.iter().map(|(c, v)| (*c, *v)));

        let mut requirements = BTreeMap::new();
        for (crop, value) in &merged {
            let field = format!("water_requirement_mm.{}", crop.code());
            requirements.insert(*crop, to_decimal(&field, *value)?);
        }
        AdvisoryThresholds::new(flood, requirements)
    }

    pub fn sowing_calendar(&self) -> Result<SowingCalendar, ReferenceError> {
        let mut merged = AgronomyConfig::default().sowing_months;
        merged.extend(self.sowing_months.clone());
        SowingCalendar::new(merged)
    }
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, ReferenceError> {
    if !value.is_finite() {
        return Err(ReferenceError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Decimal::from_f64(value).ok_or_else(|| ReferenceError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("AGRI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.open-meteo.com/v1")?
            .set_default("weather.timeout_secs", 30)?
            .set_default("weather.forecast_days", 7)?
            .set_default("geospatial.timeout_secs", 30)?
            .set_default("geospatial.max_pixels", 1e9)?
            .set_default("reference.boundaries_path", "data/sindh_with_indus_sea.geojson")?
            .set_default("reference.name_property", "NAME_2")?
            .set_default("dashboard.start_year", 2020)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRI_ prefix)
            .add_source(
                Environment::with_prefix("AGRI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_agronomy_matches_reference_values() {
        let agronomy = AgronomyConfig::default();
        assert_eq!(agronomy.thresholds().unwrap(), AdvisoryThresholds::default());
        assert_eq!(agronomy.sowing_calendar().unwrap(), SowingCalendar::default());
    }

    #[test]
    fn test_agronomy_rejects_non_finite_threshold() {
        let agronomy = AgronomyConfig {
            flood_threshold_mm: f64::NAN,
            ..AgronomyConfig::default()
        };
        assert!(agronomy.thresholds().is_err());
    }

    #[test]
    fn test_agronomy_override_threshold() {
        let agronomy = AgronomyConfig {
            flood_threshold_mm: 82.5,
            ..AgronomyConfig::default()
        };
        let thresholds = agronomy.thresholds().unwrap();
        assert_eq!(thresholds.flood_threshold_mm, Decimal::new(825, 1));
    }

    #[test]
    fn test_agronomy_partial_override_keeps_other_crops() {
        let agronomy = AgronomyConfig {
            water_requirement_mm: BTreeMap::from([(Crop::Rice, 60.0)]),
            sowing_months: BTreeMap::from([(Crop::Wheat, vec![10, 11])]),
            ..AgronomyConfig::default()
        };
        let thresholds = agronomy.thresholds().unwrap();
        assert_eq!(thresholds.water_requirement(Crop::Rice), Decimal::from(60));
        assert_eq!(thresholds.water_requirement(Crop::Wheat), Decimal::from(35));

        let calendar = agronomy.sowing_calendar().unwrap();
        assert!(calendar.months(Crop::Wheat).contains(&10));
        assert!(calendar.months(Crop::Cotton).contains(&4));
    }

    #[test]
    fn test_agronomy_rejects_bad_sowing_month() {
        let mut agronomy = AgronomyConfig::default();
        agronomy.sowing_months.insert(Crop::Rice, vec![0]);
        assert!(agronomy.sowing_calendar().is_err());
    }
}
