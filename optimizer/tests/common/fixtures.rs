//! Shared test data for the optimizer test suites

use shared::{
    CandidateSite, Coordinates, LocationQuery, OptimizationRequest, SiteId, StationType,
};

/// Standard test data used across test suites
pub struct TestFixtures;

impl TestFixtures {
    pub const CHENNAI_LAT: f64 = 13.0827;
    pub const CHENNAI_LON: f64 = 80.2707;

    pub const DEFAULT_RADIUS_KM: f64 = 50.0;
    pub const DEFAULT_BUDGET: u64 = 5_000_000;
    pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

    /// Number of candidate sites the standard fixture set produces
    pub const CANDIDATE_COUNT: usize = 8;

    pub fn chennai_center() -> Coordinates {
        Coordinates::new(Self::CHENNAI_LAT, Self::CHENNAI_LON)
    }

    /// Standard request: Chennai center, default radius and budget
    pub fn chennai_request() -> OptimizationRequest {
        OptimizationRequest {
            location: LocationQuery::Point(Self::chennai_center()),
            radius_km: Self::DEFAULT_RADIUS_KM,
            budget: Self::DEFAULT_BUDGET,
            station_type: StationType::Fast,
            max_recommendations: Self::DEFAULT_MAX_RECOMMENDATIONS,
        }
    }

    /// `count` named candidates spread around the Chennai center
    pub fn candidate_sites(count: usize) -> Vec<CandidateSite> {
        (0..count)
            .map(|index| {
                let center = Self::chennai_center();
                let coordinates = Coordinates::new(
                    center.latitude + index as f64 * 0.05,
                    center.longitude + index as f64 * 0.05,
                );
                CandidateSite::new(SiteId::from_index(index), coordinates)
                    .with_name(format!("Area {}", index + 1))
            })
            .collect()
    }
}
