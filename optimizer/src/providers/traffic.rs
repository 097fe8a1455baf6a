//! Traffic dimension: road-network density around the candidate site

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use shared::{CandidateSite, DataSourceError, Dimension, DimensionScore, OptimizationRequest};

use crate::config::ScoringTuning;
use crate::traits::{GeoDataSource, ScoringProvider};

/// Scores traffic potential from the weighted road-class mix: more and
/// higher-class roads give a higher score, saturating at 10.
pub struct TrafficProvider {
    data: Arc<dyn GeoDataSource>,
    tuning: ScoringTuning,
}

impl TrafficProvider {
    pub fn new(data: Arc<dyn GeoDataSource>, tuning: ScoringTuning) -> Self {
        Self { data, tuning }
    }
}

#[async_trait]
impl ScoringProvider for TrafficProvider {
    fn dimension(&self) -> Dimension {
        Dimension::Traffic
    }

    async fn evaluate(
        &self,
        site: &CandidateSite,
        request: &OptimizationRequest,
    ) -> Result<DimensionScore, DataSourceError> {
        let network = self
            .data
            .fetch_road_network(site.coordinates, request.radius_km)
            .await?;

        if network.is_empty() {
            return Err(DataSourceError::NoData(format!(
                "no road segments within {}km of {}",
                request.radius_km, site.id
            )));
        }

        let weighted: f64 = network
            .segments_by_class
            .iter()
            .map(|(class, count)| *count as f64 * self.tuning.road_class_weight(class))
            .sum();

        let score = if weighted > 0.0 {
            (weighted / self.tuning.traffic_saturation).min(10.0)
        } else {
            self.tuning.traffic_floor
        };

        let daily_traffic = score * self.tuning.daily_traffic_per_point;
        let road_density = (network.estimated_length_km / 100.0).min(10.0);

        debug!(
            site = %site.id,
            segments = network.total_segments,
            weighted,
            score,
            "traffic evaluation settled"
        );

        let mut metrics = BTreeMap::new();
        metrics.insert("daily_traffic".to_string(), daily_traffic);
        metrics.insert("road_density".to_string(), road_density);
        metrics.insert("road_segments".to_string(), network.total_segments as f64);

        Ok(DimensionScore::new(score, metrics))
    }
}
