//! Static reference data loaded at startup
//!
//! District boundaries come from a GeoJSON FeatureCollection; forecast
//! locations, aliases and yields default to the built-in Sindh tables.

use std::path::Path;

use geo::{BoundingRect, MultiPolygon};
use geojson::GeoJson;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::reference::{sindh_district_aliases, sindh_district_locations, sindh_reference_yields};
use shared::{Crop, DistrictAliases, DistrictLocations, DistrictSummary, GpsCoordinates, YieldRecord, YieldTable};

use crate::config::ReferenceConfig;
use crate::error::{AppError, AppResult};

/// A boundary district joined to its canonical name and forecast location
#[derive(Debug, Clone)]
pub struct District {
    /// Name as spelled in the boundary file
    pub name: String,
    pub canonical_name: String,
    pub boundary: MultiPolygon<f64>,
    pub coordinates: Option<GpsCoordinates>,
}

impl District {
    pub fn summary(&self) -> DistrictSummary {
        DistrictSummary {
            name: self.name.clone(),
            canonical_name: self.canonical_name.clone(),
            coordinates: self.coordinates,
        }
    }
}

/// Geographic bounds the map is locked to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// All district polygons taken together
#[derive(Debug, Clone)]
pub struct StudyRegion {
    pub geometry: MultiPolygon<f64>,
    pub bounds: MapBounds,
}

impl StudyRegion {
    /// Concatenate the district polygons; `None` when there is nothing to bound
    pub fn from_districts(districts: &[District]) -> Option<Self> {
        let polygons = districts
            .iter()
            .flat_map(|d| d.boundary.0.iter().cloned())
            .collect::<Vec<_>>();
        let geometry = MultiPolygon(polygons);
        let rect = geometry.bounding_rect()?;

        Some(Self {
            bounds: MapBounds {
                south: rect.min().y,
                west: rect.min().x,
                north: rect.max().y,
                east: rect.max().x,
            },
            geometry,
        })
    }
}

/// Reference data shared by every render
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub districts: Vec<District>,
    pub aliases: DistrictAliases,
    pub locations: DistrictLocations,
    pub yields: YieldTable,
    pub study_region: StudyRegion,
    pub river: Option<GeoJson>,
}

impl ReferenceData {
    /// Join raw boundary districts against the alias and location tables
    pub fn new(
        boundaries: Vec<(String, MultiPolygon<f64>)>,
        aliases: DistrictAliases,
        locations: DistrictLocations,
        yields: YieldTable,
        river: Option<GeoJson>,
    ) -> AppResult<Self> {
        let districts: Vec<District> = boundaries
            .into_iter()
            .map(|(name, boundary)| {
                let canonical_name = aliases.resolve(&name).to_string();
                let coordinates = locations.get(&canonical_name);
                District {
                    name,
                    canonical_name,
                    boundary,
                    coordinates,
                }
            })
            .collect();

        let study_region = StudyRegion::from_districts(&districts).ok_or_else(|| {
            AppError::Configuration("district boundaries contain no usable polygons".to_string())
        })?;

        Ok(Self {
            districts,
            aliases,
            locations,
            yields,
            study_region,
            river,
        })
    }

    /// Load everything named by the reference configuration
    pub fn load(config: &ReferenceConfig) -> AppResult<Self> {
        let text = std::fs::read_to_string(&config.boundaries_path).map_err(|e| {
            AppError::Configuration(format!(
                "cannot read district boundaries {}: {}",
                config.boundaries_path, e
            ))
        })?;
        let boundaries = parse_boundaries(&text, &config.name_property)?;
        tracing::info!(
            "Loaded {} district boundaries from {}",
            boundaries.len(),
            config.boundaries_path
        );

        let river = config.river_path.as_deref().and_then(load_river);

        let yields = match config.yields_path.as_deref() {
            Some(path) => load_yields_csv(Path::new(path))?,
            None => sindh_reference_yields(),
        };

        Self::new(
            boundaries,
            sindh_district_aliases(),
            sindh_district_locations(),
            yields,
            river,
        )
    }

    /// Boundary district by raw or canonical name
    pub fn find_district(&self, name: &str) -> Option<&District> {
        let canonical = self.aliases.resolve(name);
        self.districts.iter().find(|d| {
            d.name.eq_ignore_ascii_case(name.trim()) || d.canonical_name == canonical
        })
    }

    /// Forecast location for a raw or canonical name
    pub fn location_of(&self, name: &str) -> Option<(String, GpsCoordinates)> {
        let canonical = self.aliases.resolve(name);
        self.locations
            .get(canonical)
            .map(|coords| (canonical.to_string(), coords))
    }
}

/// Extract `(name, polygon)` pairs from a boundary FeatureCollection.
///
/// Features without the name property or without polygonal geometry are
/// skipped. Zero usable features is an error.
pub fn parse_boundaries(text: &str, name_property: &str) -> AppResult<Vec<(String, MultiPolygon<f64>)>> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e| AppError::Configuration(format!("invalid boundary GeoJSON: {}", e)))?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(AppError::Configuration(
            "boundary GeoJSON must be a FeatureCollection".to_string(),
        ));
    };

    let mut districts = Vec::new();
    for feature in collection.features {
        let Some(name) = feature
            .property(name_property)
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        else {
            tracing::warn!("Skipping boundary feature without '{}'", name_property);
            continue;
        };

        let Some(polygon) = feature.geometry.and_then(to_multipolygon) else {
            tracing::warn!(district = %name, "Skipping boundary feature without polygon geometry");
            continue;
        };

        districts.push((name, polygon));
    }

    if districts.is_empty() {
        return Err(AppError::Configuration(
            "boundary GeoJSON has no usable districts".to_string(),
        ));
    }
    Ok(districts)
}

fn to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geometry: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geometry {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// The river overlay is optional: any failure disables it
fn load_river(path: &str) -> Option<GeoJson> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("River overlay {} unavailable: {}", path, e);
            return None;
        }
    };
    match text.parse::<GeoJson>() {
        Ok(geojson) => Some(geojson),
        Err(e) => {
            tracing::warn!("River overlay {} is not valid GeoJSON: {}", path, e);
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct YieldRow {
    crop: String,
    district: String,
    yield_t_ha: Decimal,
}

/// Read a `crop,district,yield_t_ha` CSV; district names are stored canonical
pub fn load_yields_csv(path: &Path) -> AppResult<YieldTable> {
    let file = std::fs::File::open(path).map_err(|e| {
        AppError::Configuration(format!("cannot open yields CSV {}: {}", path.display(), e))
    })?;
    parse_yields_csv(file, &sindh_district_aliases())
}

pub fn parse_yields_csv<R: std::io::Read>(reader: R, aliases: &DistrictAliases) -> AppResult<YieldTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (line, row) in csv_reader.deserialize::<YieldRow>().enumerate() {
        let row = row.map_err(|e| {
            AppError::Configuration(format!("yields CSV row {}: {}", line + 2, e))
        })?;
        let crop: Crop = row.crop.parse().map_err(AppError::Configuration)?;
        records.push(YieldRecord {
            crop,
            district: aliases.resolve(&row.district).to_string(),
            yield_t_ha: row.yield_t_ha,
        });
    }

    Ok(records.into_iter().collect())
}
