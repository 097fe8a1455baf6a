//! Trait definitions with mockall annotations for testing
//!
//! These are the seams between the engine and its out-of-scope
//! collaborators: candidate generation, external geo-data sources,
//! geocoding and LLM-backed narration. All run behind dependency injection
//! so tests can substitute mocks without touching any real network.

use shared::{
    CandidateSite, Coordinates, DataSourceError, Dimension, DimensionScore, LocationQuery,
    OptimizationRequest,
};

use crate::types::{
    AmenitySummary, ChargingStation, FuelStation, PopulationInfo, PowerInfrastructure, RoadNetwork,
    ScoredSite,
};

/// Candidate generation abstraction
///
/// Supplies the finite, pre-deduplicated, ordered candidate set for one run.
/// An empty result is a run-level `NoCandidatesFound` condition, decided by
/// the orchestrator.
#[mockall::automock]
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    /// Generate candidate sites for the target area
    ///
    /// # Parameters
    /// - `target`: free-text place name or explicit coordinates
    /// - `radius_km`: search radius around the target
    async fn generate_candidates(
        &self,
        target: &LocationQuery,
        radius_km: f64,
    ) -> Result<Vec<CandidateSite>, DataSourceError>;
}

/// One scoring dimension
///
/// Providers are invoked independently per site and never consult another
/// provider's output; that independence is what allows concurrent,
/// order-insensitive execution and isolated failure containment.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ScoringProvider: Send + Sync {
    /// The dimension this provider scores
    fn dimension(&self) -> Dimension;

    /// Score one candidate site on this dimension
    ///
    /// # Returns
    /// A [0, 10] score with supporting metrics, or a `DataSourceError` that
    /// the runner records as a failed dimension for this site only.
    async fn evaluate(
        &self,
        site: &CandidateSite,
        request: &OptimizationRequest,
    ) -> Result<DimensionScore, DataSourceError>;
}

/// External geo-data source abstraction
///
/// Each fetch covers the area around one point and may fail independently;
/// providers translate those failures into per-dimension outcomes.
#[mockall::automock]
#[async_trait::async_trait]
pub trait GeoDataSource: Send + Sync {
    /// Road segments around a point, grouped by highway class
    async fn fetch_road_network(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<RoadNetwork, DataSourceError>;

    /// Substations and power lines around a point
    async fn fetch_power_infrastructure(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<PowerInfrastructure, DataSourceError>;

    /// Existing charging stations around a point
    async fn fetch_charging_stations(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<Vec<ChargingStation>, DataSourceError>;

    /// Fuel stations around a point (potential conversion sites)
    async fn fetch_fuel_stations(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<Vec<FuelStation>, DataSourceError>;

    /// Population of the area around a point
    async fn fetch_population(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<PopulationInfo, DataSourceError>;

    /// Amenity counts used as development/economic proxies
    async fn fetch_amenities(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<AmenitySummary, DataSourceError>;
}

/// Geocoding abstraction used by the radial candidate generator
#[mockall::automock]
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a place name to coordinates
    async fn resolve(&self, name: &str) -> Result<Coordinates, DataSourceError>;

    /// Best-effort display name for a point
    async fn reverse(&self, coordinates: Coordinates) -> Result<String, DataSourceError>;
}

/// LLM-backed narration abstraction
///
/// Best-effort with a bounded timeout; on failure the orchestrator falls
/// back to deterministic template text and records a narration failure in
/// run metadata. Narration never blocks ranking.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Narrator: Send + Sync {
    /// Produce human-readable reasoning for one scored site
    async fn explain(&self, scored: &ScoredSite) -> Result<String, DataSourceError>;
}

// Boxed forwarding impls so the binary can pick implementations at runtime
#[async_trait::async_trait]
impl Geocoder for Box<dyn Geocoder> {
    async fn resolve(&self, name: &str) -> Result<Coordinates, DataSourceError> {
        (**self).resolve(name).await
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<String, DataSourceError> {
        (**self).reverse(coordinates).await
    }
}

#[async_trait::async_trait]
impl Narrator for Box<dyn Narrator> {
    async fn explain(&self, scored: &ScoredSite) -> Result<String, DataSourceError> {
        (**self).explain(scored).await
    }
}
