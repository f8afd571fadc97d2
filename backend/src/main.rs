//! Sindh Crop & Weather Advisory Dashboard - Backend Server

use std::{net::SocketAddr, sync::Arc};

use agri_dashboard::{
    create_app,
    external::{AggregateProvider, ForecastClient, GeospatialClient},
    reference::ReferenceData,
    services::Agronomy,
    AppState, Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agri_dashboard=debug,agri_dashboard_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Sindh Advisory Dashboard Server");
    tracing::info!("Environment: {}", config.environment);

    let agronomy = Agronomy::from_config(&config.agronomy)?;

    // Reference data must load before anything is served
    let reference = ReferenceData::load(&config.reference)?;
    tracing::info!(
        districts = reference.districts.len(),
        locations = reference.locations.len(),
        yields = reference.yields.len(),
        river = reference.river.is_some(),
        "Reference data loaded"
    );

    // Geospatial session; the dashboard is useless without it
    tracing::info!("Opening geospatial session...");
    let geospatial = GeospatialClient::new(&config.geospatial)?;
    geospatial.handshake().await?;
    tracing::info!("Geospatial session established");

    let weather = ForecastClient::new(&config.weather)?;

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        weather: Arc::new(weather),
        geospatial: Arc::new(geospatial),
        reference: Arc::new(reference),
        agronomy: Arc::new(agronomy),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
