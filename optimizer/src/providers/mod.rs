//! The five scoring providers, one per evaluation dimension
//!
//! Each provider maps raw measurements from an external data source (or a
//! deterministic cost model) onto the [0, 10] scale with a documented
//! monotonic transform. Providers never consult each other's output.

mod competitor;
mod demographics;
mod grid;
mod roi;
mod traffic;

pub use competitor::CompetitorProvider;
pub use demographics::DemographicsProvider;
pub use grid::GridProvider;
pub use roi::RoiProvider;
pub use traffic::TrafficProvider;

use std::sync::Arc;

use crate::config::OptimizerConfig;
use crate::traits::{GeoDataSource, ScoringProvider};

/// Build the full five-dimension provider set against one data source.
/// Registered once at startup so the wiring of all five dimensions is
/// statically visible.
pub fn default_providers(
    data: Arc<dyn GeoDataSource>,
    config: &OptimizerConfig,
) -> Vec<Arc<dyn ScoringProvider>> {
    vec![
        Arc::new(TrafficProvider::new(data.clone(), config.tuning.clone())),
        Arc::new(GridProvider::new(data.clone(), config.tuning.clone())),
        Arc::new(CompetitorProvider::new(data.clone(), config.tuning.clone())),
        Arc::new(DemographicsProvider::new(data, config.tuning.clone())),
        Arc::new(RoiProvider::new(config.revenue.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockGeoDataSource;
    use shared::Dimension;

    #[test]
    fn test_all_five_dimensions_wired() {
        let data: Arc<dyn GeoDataSource> = Arc::new(MockGeoDataSource::new());
        let providers = default_providers(data, &OptimizerConfig::default());

        let mut dimensions: Vec<Dimension> = providers.iter().map(|p| p.dimension()).collect();
        dimensions.sort();
        dimensions.dedup();
        assert_eq!(dimensions.len(), 5);
    }
}
