//! Competition dimension: gap left by existing charging infrastructure

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use shared::{geo, CandidateSite, DataSourceError, Dimension, DimensionScore, OptimizationRequest};

use crate::config::ScoringTuning;
use crate::traits::{GeoDataSource, ScoringProvider};

/// Scores the competition gap from existing station density: fewer
/// competitors per square kilometer means a higher score, tiered rather
/// than linear.
pub struct CompetitorProvider {
    data: Arc<dyn GeoDataSource>,
    tuning: ScoringTuning,
}

impl CompetitorProvider {
    pub fn new(data: Arc<dyn GeoDataSource>, tuning: ScoringTuning) -> Self {
        Self { data, tuning }
    }
}

#[async_trait]
impl ScoringProvider for CompetitorProvider {
    fn dimension(&self) -> Dimension {
        Dimension::Competition
    }

    async fn evaluate(
        &self,
        site: &CandidateSite,
        request: &OptimizationRequest,
    ) -> Result<DimensionScore, DataSourceError> {
        let (stations, fuel) = tokio::join!(
            self.data.fetch_charging_stations(site.coordinates, request.radius_km),
            self.data.fetch_fuel_stations(site.coordinates, request.radius_km),
        );
        let stations = stations?;
        let fuel = fuel?;

        let area_km2 = PI * request.radius_km * request.radius_km;
        let density = stations.len() as f64 / area_km2;
        let score = self.tuning.competition_score(density);

        let nearest_km = stations
            .iter()
            .map(|s| geo::haversine_km(site.coordinates, s.coordinates))
            .fold(None::<f64>, |nearest, d| {
                Some(nearest.map_or(d, |n| n.min(d)))
            });

        debug!(
            site = %site.id,
            stations = stations.len(),
            density,
            score,
            "competition evaluation settled"
        );

        let mut metrics = BTreeMap::new();
        metrics.insert("existing_stations".to_string(), stations.len() as f64);
        metrics.insert("station_density".to_string(), density);
        metrics.insert("fuel_stations".to_string(), fuel.len() as f64);
        if let Some(nearest) = nearest_km {
            metrics.insert("nearest_competitor_km".to_string(), nearest);
        }

        Ok(DimensionScore::new(score, metrics))
    }
}
