//! Radial candidate generation
//!
//! Resolves the target location, then lays out the search center plus eight
//! compass offsets at 30% of the requested radius. Names are attached
//! best-effort through reverse geocoding; a failed lookup never drops a
//! candidate.

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};

use shared::{geo, CandidateSite, Coordinates, DataSourceError, LocationQuery, SiteId};

use crate::traits::{CandidateSource, Geocoder};

/// Compass unit offsets (north, east) around the center: the four
/// diagonals, then the four cardinal directions.
const COMPASS_OFFSETS: [(f64, f64); 8] = [
    (0.7, 0.7),
    (0.7, -0.7),
    (-0.7, 0.7),
    (-0.7, -0.7),
    (1.0, 0.0),
    (0.0, 1.0),
    (-1.0, 0.0),
    (0.0, -1.0),
];

/// Offset distance as a fraction of the search radius
const OFFSET_FRACTION: f64 = 0.3;

const FALLBACK_NAME: &str = "Strategic Area";

pub struct RadialCandidateSource<G: Geocoder> {
    geocoder: G,
}

impl<G: Geocoder> RadialCandidateSource<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    async fn resolve_center(&self, target: &LocationQuery) -> Result<Coordinates, DataSourceError> {
        match target {
            LocationQuery::Point(coordinates) => Ok(*coordinates),
            LocationQuery::Name(name) => self.geocoder.resolve(name).await,
        }
    }
}

/// Round to four decimals for the dedup key (about eleven meters)
fn dedup_key(coordinates: Coordinates) -> (i64, i64) {
    (
        (coordinates.latitude * 1e4).round() as i64,
        (coordinates.longitude * 1e4).round() as i64,
    )
}

#[async_trait]
impl<G: Geocoder + Send + Sync> CandidateSource for RadialCandidateSource<G> {
    async fn generate_candidates(
        &self,
        target: &LocationQuery,
        radius_km: f64,
    ) -> Result<Vec<CandidateSite>, DataSourceError> {
        let center = self.resolve_center(target).await?;
        let offset_km = radius_km * OFFSET_FRACTION;

        let mut points = vec![center];
        for (north, east) in COMPASS_OFFSETS {
            points.push(geo::offset_km(center, north * offset_km, east * offset_km));
        }

        // Tight radii can collapse neighboring offsets onto the same spot
        let mut seen = std::collections::HashSet::new();
        points.retain(|point| seen.insert(dedup_key(*point)));

        let names = join_all(points.iter().map(|point| self.geocoder.reverse(*point))).await;

        let candidates: Vec<CandidateSite> = points
            .into_iter()
            .zip(names)
            .enumerate()
            .map(|(index, (coordinates, name))| {
                let name = match name {
                    Ok(name) if !name.trim().is_empty() => name,
                    Ok(_) => FALLBACK_NAME.to_string(),
                    Err(err) => {
                        warn!(index, error = %err, "reverse geocoding failed, using fallback name");
                        FALLBACK_NAME.to_string()
                    }
                };
                CandidateSite::new(SiteId::from_index(index), coordinates).with_name(name)
            })
            .collect();

        debug!(count = candidates.len(), "candidates generated");
        Ok(candidates)
    }
}
