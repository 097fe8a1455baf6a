//! Grid dimension: power-infrastructure capacity and headroom

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use shared::{CandidateSite, DataSourceError, Dimension, DimensionScore, OptimizationRequest};

use crate::config::ScoringTuning;
use crate::traits::{GeoDataSource, ScoringProvider};

/// Scores grid readiness from substation counts, line density and an
/// estimated load factor: 0.4 x infrastructure + 0.4 x reliability +
/// 0.2 x (10 - 10 x load_factor).
pub struct GridProvider {
    data: Arc<dyn GeoDataSource>,
    tuning: ScoringTuning,
}

impl GridProvider {
    pub fn new(data: Arc<dyn GeoDataSource>, tuning: ScoringTuning) -> Self {
        Self { data, tuning }
    }
}

#[async_trait]
impl ScoringProvider for GridProvider {
    fn dimension(&self) -> Dimension {
        Dimension::Grid
    }

    async fn evaluate(
        &self,
        site: &CandidateSite,
        request: &OptimizationRequest,
    ) -> Result<DimensionScore, DataSourceError> {
        let (power, population, amenities) = tokio::join!(
            self.data.fetch_power_infrastructure(site.coordinates, request.radius_km),
            self.data.fetch_population(site.coordinates, request.radius_km),
            self.data.fetch_amenities(site.coordinates, request.radius_km),
        );
        let power = power?;
        let population = population?;
        let amenities = amenities?;

        let substations = power.substations as f64;
        let hv_substations = power.high_voltage_substations as f64;
        let lines = power.power_lines as f64;

        let infrastructure_density = substations + lines * 0.1;
        let infrastructure_score =
            (substations * 1.5 + hv_substations * 3.0 + infrastructure_density * 0.1).min(10.0);
        let reliability_score = (substations * 0.8 + lines * 0.1 + hv_substations * 1.5).min(10.0);

        let capacity_mw = (substations * self.tuning.capacity_per_substation_mw
            + hv_substations * self.tuning.capacity_per_hv_substation_mw)
            .max(self.tuning.min_capacity_mw);

        // Load estimate: residential draw per head plus an industrial proxy
        let base_load_mw = population.population as f64 * self.tuning.load_kw_per_person / 1000.0;
        let industrial_load_mw = amenities.industrial_load_score() * 5.0;
        let load_factor = ((base_load_mw + industrial_load_mw) / capacity_mw).min(0.95);
        let available_capacity_mw = capacity_mw * (1.0 - load_factor);

        let score = infrastructure_score * 0.4
            + reliability_score * 0.4
            + (10.0 - load_factor * 10.0) * 0.2;

        debug!(
            site = %site.id,
            substations = power.substations,
            hv = power.high_voltage_substations,
            capacity_mw,
            load_factor,
            score,
            "grid evaluation settled"
        );

        let mut metrics = BTreeMap::new();
        metrics.insert("capacity_mw".to_string(), capacity_mw);
        metrics.insert("available_capacity_mw".to_string(), available_capacity_mw);
        metrics.insert("load_factor".to_string(), load_factor);
        metrics.insert("reliability_score".to_string(), reliability_score);
        metrics.insert("infrastructure_score".to_string(), infrastructure_score);

        Ok(DimensionScore::new(score, metrics))
    }
}
