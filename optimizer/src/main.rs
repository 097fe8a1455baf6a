//! Command-line entry point
//!
//! Runs one optimization for a target location and prints the result as
//! JSON. Data sources are selectable: live OpenStreetMap services or the
//! deterministic offline backend.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use optimizer::config::OptimizerConfig;
use optimizer::providers::default_providers;
use optimizer::services::{
    GeminiNarrator, NominatimGeocoder, OsmGeoData, RadialCandidateSource, SyntheticGeoData,
    SyntheticGeocoder, TemplateNarrator,
};
use optimizer::traits::{GeoDataSource, Geocoder, Narrator};
use optimizer::OptimizerOrchestrator;
use shared::{Coordinates, LocationQuery, OptimizationRequest, StationType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DataSourceKind {
    /// Live Overpass / Nominatim / GeoNames queries
    Osm,
    /// Deterministic offline data, no network required
    Synthetic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StationKind {
    Regular,
    Fast,
    UltraFast,
}

impl From<StationKind> for StationType {
    fn from(kind: StationKind) -> Self {
        match kind {
            StationKind::Regular => StationType::Regular,
            StationKind::Fast => StationType::Fast,
            StationKind::UltraFast => StationType::UltraFast,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "optimizer")]
#[command(about = "EV charging site optimizer")]
struct Args {
    /// Target location: a place name or "lat,lon"
    #[arg(long)]
    location: String,

    /// Search radius in kilometers
    #[arg(long, default_value_t = 50.0)]
    radius_km: f64,

    /// Total budget in currency units
    #[arg(long, default_value_t = 5_000_000)]
    budget: u64,

    /// Station type to plan for
    #[arg(long, value_enum, default_value_t = StationKind::Fast)]
    station_type: StationKind,

    /// Maximum number of recommendations to return
    #[arg(long, default_value_t = 5)]
    max_recommendations: usize,

    /// Geo-data backend
    #[arg(long, value_enum, default_value_t = DataSourceKind::Synthetic)]
    data_source: DataSourceKind,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

/// "13.0827,80.2707" parses as a point, anything else is a place name
fn parse_location(raw: &str) -> LocationQuery {
    let mut parts = raw.splitn(2, ',');
    if let (Some(lat), Some(lon)) = (parts.next(), parts.next()) {
        if let (Ok(latitude), Ok(longitude)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>())
        {
            return LocationQuery::Point(Coordinates::new(latitude, longitude));
        }
    }
    LocationQuery::Name(raw.to_string())
}

fn build_narrator() -> Box<dyn Narrator> {
    match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Box::new(GeminiNarrator::new(key)),
        _ => {
            info!("GEMINI_API_KEY not set, using template narratives");
            Box::new(TemplateNarrator::new())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    shared::logging::init_tracing(args.log_level.as_deref());

    let (data, geocoder): (Arc<dyn GeoDataSource>, Box<dyn Geocoder>) = match args.data_source {
        DataSourceKind::Osm => {
            let geonames_username =
                std::env::var("GEONAMES_USERNAME").unwrap_or_else(|_| "demo".to_string());
            if geonames_username == "demo" {
                warn!("GEONAMES_USERNAME not set, population lookups use the rate-limited demo account");
            }
            (
                Arc::new(OsmGeoData::new(geonames_username)),
                Box::new(NominatimGeocoder::new()),
            )
        }
        DataSourceKind::Synthetic => (
            Arc::new(SyntheticGeoData::new()),
            Box::new(SyntheticGeocoder::new()),
        ),
    };

    let config = OptimizerConfig::default();
    let providers = default_providers(data, &config);
    let orchestrator = OptimizerOrchestrator::new(
        RadialCandidateSource::new(geocoder),
        build_narrator(),
        providers,
        config,
    )?;

    let request = OptimizationRequest {
        location: parse_location(&args.location),
        radius_km: args.radius_km,
        budget: args.budget,
        station_type: args.station_type.into(),
        max_recommendations: args.max_recommendations,
    };

    let result = orchestrator.optimize(request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
