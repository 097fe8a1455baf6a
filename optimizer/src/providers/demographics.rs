//! Demographics dimension: population, development and EV-readiness

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use shared::{CandidateSite, DataSourceError, Dimension, DimensionScore, OptimizationRequest};

use crate::config::ScoringTuning;
use crate::traits::{GeoDataSource, ScoringProvider};

/// Scores market fit from population density, a development index derived
/// from amenity counts, economic activity and an estimated EV adoption rate:
/// 0.3 x density + 0.3 x development + 0.2 x economic + 0.2 x adoption.
pub struct DemographicsProvider {
    data: Arc<dyn GeoDataSource>,
    tuning: ScoringTuning,
}

impl DemographicsProvider {
    pub fn new(data: Arc<dyn GeoDataSource>, tuning: ScoringTuning) -> Self {
        Self { data, tuning }
    }
}

#[async_trait]
impl ScoringProvider for DemographicsProvider {
    fn dimension(&self) -> Dimension {
        Dimension::Demographics
    }

    async fn evaluate(
        &self,
        site: &CandidateSite,
        request: &OptimizationRequest,
    ) -> Result<DimensionScore, DataSourceError> {
        let (population, amenities) = tokio::join!(
            self.data.fetch_population(site.coordinates, request.radius_km),
            self.data.fetch_amenities(site.coordinates, request.radius_km),
        );
        let population = population?;
        let amenities = amenities?;

        let density_score = (population.density_per_km2 / 1000.0).min(10.0);
        let development_index = amenities.development_index();
        let economic_score = amenities.economic_score();

        let adoption_rate = (self.tuning.base_ev_adoption
            * (development_index / 5.0)
            * (economic_score / 5.0))
            .min(self.tuning.max_ev_adoption);

        let score = (density_score * 0.3
            + development_index * 0.3
            + economic_score * 0.2
            + adoption_rate * 100.0 * 0.2)
            .min(10.0);

        debug!(
            site = %site.id,
            density = population.density_per_km2,
            development_index,
            adoption_rate,
            score,
            "demographics evaluation settled"
        );

        let mut metrics = BTreeMap::new();
        metrics.insert("population".to_string(), population.population as f64);
        metrics.insert("population_density".to_string(), population.density_per_km2);
        metrics.insert("development_index".to_string(), development_index);
        metrics.insert("economic_score".to_string(), economic_score);
        metrics.insert("ev_adoption_rate".to_string(), adoption_rate);

        Ok(DimensionScore::new(score, metrics))
    }
}
