//! Geospatial analysis gateway client
//!
//! Raster reductions, NDVI time series and map tile templates are computed
//! remotely. Requests are JSON `POST`s to `{endpoint}/v1/{session|reduce|series|tiles}`
//! carrying the project id, authenticated with the `x-api-key` header.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use geo::MultiPolygon;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{DateRange, NdviSample, QueryOutcome, Reducer, RegionalAggregate, VisParams};

use crate::config::GeospatialConfig;
use crate::error::{AppError, AppResult};

/// Raster image to reduce or render
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSpec {
    /// Mean of a collection's band over `[start, end)`
    Composite {
        collection: String,
        band: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Mean over `[start, end)` minus the mean over the baseline period
    Anomaly {
        collection: String,
        band: String,
        start: NaiveDate,
        end: NaiveDate,
        baseline_start: NaiveDate,
        baseline_end: NaiveDate,
    },
}

impl ImageSpec {
    pub fn composite(collection: &str, band: &str, range: DateRange) -> Self {
        ImageSpec::Composite {
            collection: collection.to_string(),
            band: band.to_string(),
            start: range.start,
            end: range.end,
        }
    }

    pub fn anomaly(collection: &str, band: &str, range: DateRange, baseline: DateRange) -> Self {
        ImageSpec::Anomaly {
            collection: collection.to_string(),
            band: band.to_string(),
            start: range.start,
            end: range.end,
            baseline_start: baseline.start,
            baseline_end: baseline.end,
        }
    }

    pub fn band(&self) -> &str {
        match self {
            ImageSpec::Composite { band, .. } | ImageSpec::Anomaly { band, .. } => band,
        }
    }
}

/// Polygon a query runs over, with its pixel scale and budget
#[derive(Debug, Clone, Copy)]
pub struct RegionQuery<'a> {
    pub geometry: &'a MultiPolygon<f64>,
    /// Pixel size in metres
    pub scale: f64,
    pub max_pixels: f64,
}

/// Remote raster analysis used by the dashboard
#[async_trait]
pub trait AggregateProvider: Send + Sync {
    /// Open the analysis session. Failure is fatal at startup.
    async fn handshake(&self) -> AppResult<()>;

    async fn reduce_region(
        &self,
        image: &ImageSpec,
        reducer: Reducer,
        region: RegionQuery<'_>,
    ) -> QueryOutcome<RegionalAggregate>;

    /// Per-composite mean of `band` over the region, one sample per image
    async fn ndvi_series(
        &self,
        collection: &str,
        band: &str,
        range: DateRange,
        region: RegionQuery<'_>,
    ) -> QueryOutcome<Vec<NdviSample>>;

    /// Tile URL template for an image rendered with `vis`
    async fn map_tiles(&self, image: &ImageSpec, vis: &VisParams) -> QueryOutcome<String>;
}

/// HTTP client for the analysis gateway
#[derive(Clone)]
pub struct GeospatialClient {
    endpoint: String,
    api_key: String,
    project_id: String,
    http_client: Client,
}

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    project_id: &'a str,
}

#[derive(Debug, Serialize)]
struct ReduceRequest<'a> {
    project_id: &'a str,
    image: &'a ImageSpec,
    reducer: Reducer,
    geometry: geojson::Geometry,
    scale: f64,
    max_pixels: f64,
}

#[derive(Debug, Serialize)]
struct SeriesRequest<'a> {
    project_id: &'a str,
    collection: &'a str,
    band: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    geometry: geojson::Geometry,
    scale: f64,
    max_pixels: f64,
}

#[derive(Debug, Serialize)]
struct TilesRequest<'a> {
    project_id: &'a str,
    image: &'a ImageSpec,
    vis: &'a VisParams,
}

/// Reduction response: band keys to values, nulls where no pixel was valid
#[derive(Debug, Deserialize)]
struct ReduceResponse {
    #[serde(default)]
    values: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    values: Vec<SeriesPoint>,
}

#[derive(Debug, Deserialize)]
struct SeriesPoint {
    date: NaiveDate,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TilesResponse {
    url_template: Option<String>,
}

fn to_geojson(geometry: &MultiPolygon<f64>) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::from(geometry))
}

impl GeospatialClient {
    pub fn new(config: &GeospatialConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("geospatial HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            project_id: config.project_id.clone(),
            http_client,
        })
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, String> {
        let url = format!("{}/v1/{}", self.endpoint, path);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("gateway returned {}: {}", status, body));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| format!("malformed gateway response: {}", e))
    }

    pub async fn open_session(&self) -> AppResult<()> {
        let request = SessionRequest {
            project_id: &self.project_id,
        };
        self.post::<_, serde_json::Value>("session", &request)
            .await
            .map(|_| ())
            .map_err(AppError::GeospatialInit)
    }

    pub async fn reduce(
        &self,
        image: &ImageSpec,
        reducer: Reducer,
        region: RegionQuery<'_>,
    ) -> QueryOutcome<RegionalAggregate> {
        let request = ReduceRequest {
            project_id: &self.project_id,
            image,
            reducer,
            geometry: to_geojson(region.geometry),
            scale: region.scale,
            max_pixels: region.max_pixels,
        };

        match self.post::<_, ReduceResponse>("reduce", &request).await {
            Ok(response) => aggregate_from_values(&response.values, image.band(), reducer),
            Err(reason) => {
                tracing::warn!(band = image.band(), "Regional reduction failed: {}", reason);
                QueryOutcome::Failed(reason)
            }
        }
    }

    pub async fn series(
        &self,
        collection: &str,
        band: &str,
        range: DateRange,
        region: RegionQuery<'_>,
    ) -> QueryOutcome<Vec<NdviSample>> {
        let request = SeriesRequest {
            project_id: &self.project_id,
            collection,
            band,
            start: range.start,
            end: range.end,
            geometry: to_geojson(region.geometry),
            scale: region.scale,
            max_pixels: region.max_pixels,
        };

        match self.post::<_, SeriesResponse>("series", &request).await {
            Ok(response) if response.values.is_empty() => QueryOutcome::Absent,
            Ok(response) => QueryOutcome::Data(
                response
                    .values
                    .into_iter()
                    .map(|p| NdviSample {
                        date: p.date,
                        raw: p.value,
                    })
                    .collect(),
            ),
            Err(reason) => {
                tracing::warn!(collection, band, "Time series query failed: {}", reason);
                QueryOutcome::Failed(reason)
            }
        }
    }

    pub async fn tiles(&self, image: &ImageSpec, vis: &VisParams) -> QueryOutcome<String> {
        let request = TilesRequest {
            project_id: &self.project_id,
            image,
            vis,
        };

        match self.post::<_, TilesResponse>("tiles", &request).await {
            Ok(TilesResponse {
                url_template: Some(url),
            }) if !url.is_empty() => QueryOutcome::Data(url),
            Ok(_) => QueryOutcome::Absent,
            Err(reason) => {
                tracing::warn!(band = image.band(), "Tile request failed: {}", reason);
                QueryOutcome::Failed(reason)
            }
        }
    }
}

#[async_trait]
impl AggregateProvider for GeospatialClient {
    async fn handshake(&self) -> AppResult<()> {
        self.open_session().await
    }

    async fn reduce_region(
        &self,
        image: &ImageSpec,
        reducer: Reducer,
        region: RegionQuery<'_>,
    ) -> QueryOutcome<RegionalAggregate> {
        self.reduce(image, reducer, region).await
    }

    async fn ndvi_series(
        &self,
        collection: &str,
        band: &str,
        range: DateRange,
        region: RegionQuery<'_>,
    ) -> QueryOutcome<Vec<NdviSample>> {
        self.series(collection, band, range, region).await
    }

    async fn map_tiles(&self, image: &ImageSpec, vis: &VisParams) -> QueryOutcome<String> {
        self.tiles(image, vis).await
    }
}

/// Pick the reducer's outputs out of a `values` map.
///
/// Means are keyed by band name; percentiles by `{band}_p5` and `{band}_p95`.
/// An empty map or a null value is `Absent`.
pub fn aggregate_from_values(
    values: &BTreeMap<String, Option<f64>>,
    band: &str,
    reducer: Reducer,
) -> QueryOutcome<RegionalAggregate> {
    let lookup = |key: &str| values.get(key).copied().flatten();

    match reducer {
        Reducer::Mean => match lookup(band) {
            Some(value) => QueryOutcome::Data(RegionalAggregate::Mean { value }),
            None => QueryOutcome::Absent,
        },
        Reducer::Percentile5_95 => {
            match (lookup(&format!("{}_p5", band)), lookup(&format!("{}_p95", band))) {
                (Some(p5), Some(p95)) => QueryOutcome::Data(RegionalAggregate::Range { p5, p95 }),
                _ => QueryOutcome::Absent,
            }
        }
    }
}
