//! Dashboard render pipeline
//!
//! One render turns a [`DashboardRequest`] into a [`DashboardView`]. Remote
//! queries run one after another; a failed query degrades the piece of the
//! view that needed it and nothing else.

use chrono::{Datelike, NaiveDate};
use geojson::GeoJson;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::advisory::{ndvi_trend, scale_ndvi, trend_window};
use shared::reference::{SINDH_MAP_CENTER, SINDH_MAP_ZOOM};
use shared::{
    AdvisoryResult, Crop, DailyForecast, DashboardRequest, DateRange, ForecastSeries,
    ForecastSummary, NdviTrend, OverlayKind, QueryOutcome, Reducer, SowingAdvisory, VisParams,
    VisRange, YieldRecord,
};

use super::advisory::Agronomy;
use super::forecast_cache::ForecastCache;
use super::overlay::{legend, overlay_spec, Legend, VisMode, NDVI_BAND, NDVI_COLLECTION, NDVI_SCALE_M};
use crate::external::{AggregateProvider, ForecastSource, ImageSpec, RegionQuery};
use crate::reference::{District, MapBounds, ReferenceData};

const OVERLAY_OPACITY: f64 = 0.8;

/// Initial map position; panning is limited to `bounds`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapFrame {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub min_zoom: u8,
    pub bounds: MapBounds,
}

/// A rendered satellite overlay
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OverlayLayer {
    pub kind: OverlayKind,
    pub name: String,
    pub tile_url: String,
    pub vis: VisParams,
    pub attribution: String,
    pub opacity: f64,
}

/// Everything shown when hovering a district
#[derive(Debug, Clone, Serialize)]
pub struct DistrictPopup {
    pub name: String,
    pub canonical_name: String,
    pub boundary: geojson::Geometry,
    /// Mean NDVI for the selected month, on the index scale
    pub ndvi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndvi_note: Option<String>,
    pub yield_t_ha: Option<Decimal>,
    pub forecast: Option<ForecastSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_note: Option<String>,
}

/// 7-day chart series for one district
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForecastChart {
    pub district: String,
    pub days: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YieldChart {
    pub crop: Crop,
    pub records: Vec<YieldRecord>,
}

/// A fully rendered dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub request: DashboardRequest,
    pub sowing: SowingAdvisory,
    pub map: MapFrame,
    pub overlays: Vec<OverlayLayer>,
    pub legend: Legend,
    pub districts: Vec<DistrictPopup>,
    pub forecast_charts: Vec<ForecastChart>,
    pub advisories: Vec<AdvisoryResult>,
    pub yield_chart: YieldChart,
    pub ndvi_trends: Vec<NdviTrend>,
    pub river: Option<GeoJson>,
}

/// Dashboard service over a forecast source and an aggregate provider
pub struct DashboardService<'a, W, G> {
    weather: &'a W,
    geospatial: &'a G,
    reference: &'a ReferenceData,
    agronomy: &'a Agronomy,
    max_pixels: f64,
}

impl<'a, W, G> DashboardService<'a, W, G>
where
    W: ForecastSource,
    G: AggregateProvider,
{
    pub fn new(
        weather: &'a W,
        geospatial: &'a G,
        reference: &'a ReferenceData,
        agronomy: &'a Agronomy,
        max_pixels: f64,
    ) -> Self {
        Self {
            weather,
            geospatial,
            reference,
            agronomy,
            max_pixels,
        }
    }

    /// Render the whole dashboard for one set of controls
    pub async fn render(&self, request: &DashboardRequest) -> DashboardView {
        let mut forecasts = ForecastCache::new();
        let month_range = request.month_range();

        let sowing = self.sowing(request.crop, request.today);
        let overlays = match month_range {
            Some(range) => self.overlay_layers(request, range).await,
            None => Vec::new(),
        };
        let legend = legend(request.overlays.legend_overlay());

        let districts = self
            .district_popups(request.crop, month_range, &mut forecasts)
            .await;
        let forecast_series = self.located_forecasts(&mut forecasts).await;

        let advisories = forecast_series
            .iter()
            .flat_map(|(district, series)| {
                self.agronomy
                    .forecast_advisories(district, request.crop, series)
            })
            .collect();
        let forecast_charts = forecast_series
            .into_iter()
            .map(|(district, series)| ForecastChart {
                district,
                days: series.days,
            })
            .collect();

        let yield_chart = self.yield_chart(request.crop);
        let ndvi_trends = self.ndvi_trends(request.crop, request.today).await;

        tracing::debug!(
            crop = %request.crop,
            year = request.year,
            month = request.month,
            forecast_fetches = forecasts.fetches(),
            "Dashboard rendered"
        );

        DashboardView {
            request: request.clone(),
            sowing,
            map: self.map_frame(),
            overlays,
            legend,
            districts,
            forecast_charts,
            advisories,
            yield_chart,
            ndvi_trends,
            river: self.reference.river.clone(),
        }
    }

    /// Sowing advisory anchored to `today`
    pub fn sowing(&self, crop: Crop, today: NaiveDate) -> SowingAdvisory {
        self.agronomy.sowing(crop, today.month(), today.year())
    }

    pub fn map_frame(&self) -> MapFrame {
        MapFrame {
            center_latitude: SINDH_MAP_CENTER.0,
            center_longitude: SINDH_MAP_CENTER.1,
            zoom: SINDH_MAP_ZOOM,
            min_zoom: SINDH_MAP_ZOOM,
            bounds: self.reference.study_region.bounds,
        }
    }

    fn study_region(&self, scale: f64) -> RegionQuery<'_> {
        RegionQuery {
            geometry: &self.reference.study_region.geometry,
            scale,
            max_pixels: self.max_pixels,
        }
    }

    async fn overlay_layers(&self, request: &DashboardRequest, month: DateRange) -> Vec<OverlayLayer> {
        let mut layers = Vec::new();

        for kind in request.overlays.enabled() {
            let spec = overlay_spec(kind);
            let image = spec.image(month);

            let range = match spec.vis {
                VisMode::Fixed(range) => range,
                VisMode::Dynamic => {
                    let stats = self
                        .geospatial
                        .reduce_region(&image, Reducer::Percentile5_95, self.study_region(spec.scale))
                        .await;
                    VisRange::from_percentiles(&stats)
                }
            };
            let vis = VisParams::new(range, spec.palette);

            match self.geospatial.map_tiles(&image, &vis).await {
                QueryOutcome::Data(tile_url) => layers.push(OverlayLayer {
                    kind,
                    name: kind.label().to_string(),
                    tile_url,
                    vis,
                    attribution: spec.attribution.to_string(),
                    opacity: OVERLAY_OPACITY,
                }),
                other => {
                    tracing::warn!(
                        overlay = kind.label(),
                        "Overlay omitted: {}",
                        other.unavailable_note().unwrap_or_default()
                    );
                }
            }
        }

        layers
    }

    async fn district_ndvi(&self, district: &District, month: DateRange) -> QueryOutcome<f64> {
        let image = ImageSpec::composite(NDVI_COLLECTION, NDVI_BAND, month);
        let region = RegionQuery {
            geometry: &district.boundary,
            scale: NDVI_SCALE_M,
            max_pixels: self.max_pixels,
        };
        self.geospatial
            .reduce_region(&image, Reducer::Mean, region)
            .await
            .and_then_option(|aggregate| aggregate.mean())
            .map(scale_ndvi)
    }

    async fn district_popups(
        &self,
        crop: Crop,
        month: Option<DateRange>,
        forecasts: &mut ForecastCache,
    ) -> Vec<DistrictPopup> {
        let mut popups = Vec::with_capacity(self.reference.districts.len());

        for district in &self.reference.districts {
            let ndvi = match month {
                Some(range) => self.district_ndvi(district, range).await,
                None => QueryOutcome::Absent,
            };

            let forecast = match district.coordinates {
                Some(location) => Some(forecasts.get(self.weather, &district.canonical_name, location).await),
                None => None,
            };

            popups.push(DistrictPopup {
                name: district.name.clone(),
                canonical_name: district.canonical_name.clone(),
                boundary: geojson::Geometry::new(geojson::Value::from(&district.boundary)),
                ndvi_note: ndvi.unavailable_note(),
                ndvi: ndvi.data(),
                yield_t_ha: self
                    .reference
                    .yields
                    .lookup(&self.reference.aliases, crop, &district.name),
                forecast_note: forecast.as_ref().and_then(|f| f.unavailable_note()),
                forecast: forecast.and_then(|f| f.data()).map(|series| series.summary()),
            });
        }

        popups
    }

    /// Forecasts for every district with known coordinates
    async fn located_forecasts(&self, forecasts: &mut ForecastCache) -> Vec<(String, ForecastSeries)> {
        let mut located = Vec::new();
        for (canonical, location) in self.reference.locations.iter() {
            if let QueryOutcome::Data(series) = forecasts.get(self.weather, canonical, location).await {
                located.push((canonical.to_string(), series));
            }
        }
        located
    }

    pub fn yield_chart(&self, crop: Crop) -> YieldChart {
        YieldChart {
            crop,
            records: self.reference.yields.records_for(crop),
        }
    }

    /// Trend for one boundary district over the trailing 12 months; `None`
    /// without usable samples
    pub async fn district_trend(&self, district: &District, today: NaiveDate) -> Option<NdviTrend> {
        let region = RegionQuery {
            geometry: &district.boundary,
            scale: NDVI_SCALE_M,
            max_pixels: self.max_pixels,
        };
        let window = trend_window(today);
        let mut samples = match self
            .geospatial
            .ndvi_series(NDVI_COLLECTION, NDVI_BAND, window, region)
            .await
        {
            QueryOutcome::Data(samples) => samples,
            other => {
                tracing::debug!(
                    district = %district.canonical_name,
                    "NDVI trend unavailable: {}",
                    other.unavailable_note().unwrap_or_default()
                );
                return None;
            }
        };

        samples.retain(|sample| window.contains(sample.date));
        let points = ndvi_trend(&samples);
        if points.is_empty() {
            return None;
        }
        Some(NdviTrend {
            district: district.canonical_name.clone(),
            points,
        })
    }

    /// Trends for districts that have both a yield record and a boundary
    async fn ndvi_trends(&self, crop: Crop, today: NaiveDate) -> Vec<NdviTrend> {
        let mut trends = Vec::new();
        for record in self.reference.yields.records_for(crop) {
            let Some(district) = self.reference.find_district(&record.district) else {
                continue;
            };
            if let Some(trend) = self.district_trend(district, today).await {
                trends.push(trend);
            }
        }
        trends
    }

    /// Chart series for one district, by raw or canonical name
    pub async fn district_forecast(&self, name: &str) -> Option<QueryOutcome<ForecastChart>> {
        let (canonical, location) = self.reference.location_of(name)?;
        let outcome = self.weather.daily_forecast(location).await;
        Some(outcome.map(|series| ForecastChart {
            district: canonical,
            days: series.days,
        }))
    }

    /// Irrigation and flood advisories for one district
    pub async fn district_advisories(
        &self,
        name: &str,
        crop: Crop,
    ) -> Option<QueryOutcome<Vec<AdvisoryResult>>> {
        let (canonical, location) = self.reference.location_of(name)?;
        let outcome = self.weather.daily_forecast(location).await;
        Some(outcome.map(|series| self.agronomy.forecast_advisories(&canonical, crop, &series)))
    }
}
