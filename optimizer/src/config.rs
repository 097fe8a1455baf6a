//! Engine configuration
//!
//! All tuning lives here as an explicit value passed to the orchestrator at
//! construction; there is no ambient global state, so concurrent runs with
//! different configurations are safe.

use std::time::Duration;

use shared::{Dimension, StationType};

use crate::error::{OptimizerError, OptimizerResult};

/// Fixed base weights per dimension. Must sum to 1.0; renormalized over the
/// surviving dimensions when providers fail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DimensionWeights {
    pub traffic: f64,
    pub grid: f64,
    pub competition: f64,
    pub demographics: f64,
    pub roi: f64,
}

impl DimensionWeights {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Traffic => self.traffic,
            Dimension::Grid => self.grid,
            Dimension::Competition => self.competition,
            Dimension::Demographics => self.demographics,
            Dimension::Roi => self.roi,
        }
    }

    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.get(*d)).sum()
    }
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            traffic: 0.25,
            grid: 0.20,
            competition: 0.20,
            demographics: 0.15,
            roi: 0.20,
        }
    }
}

/// Transform parameters for mapping raw measurements onto the [0, 10] scale.
/// Defaults follow the regional cost and road-network model the providers
/// were calibrated against.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoringTuning {
    /// Divisor for the road-class weighted count; weighted/saturation caps at 10
    pub traffic_saturation: f64,
    /// Baseline traffic score when the road network yields zero weight
    pub traffic_floor: f64,
    /// Estimated daily vehicles per traffic-score point
    pub daily_traffic_per_point: f64,
    /// Estimated MW of grid capacity per ordinary substation
    pub capacity_per_substation_mw: f64,
    /// Estimated MW per high-voltage substation
    pub capacity_per_hv_substation_mw: f64,
    /// Floor for the capacity estimate
    pub min_capacity_mw: f64,
    /// Estimated grid load in kW per inhabitant
    pub load_kw_per_person: f64,
    /// Competition-gap score tiers by station density (stations per km^2)
    pub competition_density_tiers: [(f64, f64); 3],
    /// Gap score when no stations exist in the radius
    pub competition_open_market_score: f64,
    /// Gap score beyond the last density tier
    pub competition_saturated_score: f64,
    /// Baseline EV adoption rate scaled by development and economic indices
    pub base_ev_adoption: f64,
    /// Cap on the estimated adoption rate
    pub max_ev_adoption: f64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            traffic_saturation: 50.0,
            traffic_floor: 3.0,
            daily_traffic_per_point: 5000.0,
            capacity_per_substation_mw: 50.0,
            capacity_per_hv_substation_mw: 200.0,
            min_capacity_mw: 100.0,
            load_kw_per_person: 1.0,
            competition_density_tiers: [(0.1, 8.5), (0.3, 7.0), (f64::INFINITY, 5.0)],
            competition_open_market_score: 10.0,
            competition_saturated_score: 5.0,
            base_ev_adoption: 0.02,
            max_ev_adoption: 0.25,
        }
    }
}

impl ScoringTuning {
    /// Traffic weight for an OSM highway class
    pub fn road_class_weight(&self, class: &str) -> f64 {
        match class {
            "motorway" => 10.0,
            "trunk" => 9.0,
            "primary" => 8.0,
            "secondary" => 6.0,
            "tertiary" => 4.0,
            "residential" => 2.0,
            "service" => 1.0,
            _ => 1.0,
        }
    }

    /// Competition-gap score for a station density (stations per km^2)
    pub fn competition_score(&self, density: f64) -> f64 {
        if density <= 0.0 {
            return self.competition_open_market_score;
        }
        for (threshold, score) in self.competition_density_tiers {
            if density < threshold {
                return score;
            }
        }
        self.competition_saturated_score
    }
}

/// Deterministic revenue model used for insight derivation and ROI scoring
#[derive(Clone, Debug, PartialEq)]
pub struct RevenueModel {
    /// Share of daily passing traffic that stops to charge
    pub capture_rate: f64,
    /// Effective utilization of captured demand
    pub utilization: f64,
}

impl Default for RevenueModel {
    fn default() -> Self {
        Self {
            capture_rate: 0.002,
            utilization: 0.6,
        }
    }
}

impl RevenueModel {
    /// Net margin per charging session in currency units
    pub fn margin_per_session(&self, station_type: StationType) -> f64 {
        match station_type {
            StationType::Regular => 150.0,
            StationType::Fast => 400.0,
            StationType::UltraFast => 600.0,
        }
    }

    /// Baseline monthly revenue when no traffic estimate is available
    pub fn base_monthly_revenue(&self, station_type: StationType) -> f64 {
        match station_type {
            StationType::Regular => 80_000.0,
            StationType::Fast => 180_000.0,
            StationType::UltraFast => 320_000.0,
        }
    }

    /// Typical installation cost for the hardware class
    pub fn installation_cost(&self, station_type: StationType) -> f64 {
        match station_type {
            StationType::Regular => 2_000_000.0,
            StationType::Fast => 4_500_000.0,
            StationType::UltraFast => 7_000_000.0,
        }
    }

    /// Monthly revenue estimate from a daily traffic count:
    /// sessions/day = daily_traffic x capture_rate x utilization, times the
    /// per-session margin, times 30 days.
    pub fn monthly_revenue(&self, daily_traffic: f64, station_type: StationType) -> f64 {
        daily_traffic * self.capture_rate * self.utilization * self.margin_per_session(station_type) * 30.0
    }
}

/// Full engine configuration
#[derive(Clone, Debug)]
pub struct OptimizerConfig {
    pub weights: DimensionWeights,
    pub tuning: ScoringTuning,
    pub revenue: RevenueModel,
    /// Per-provider-call timeout; an elapsed call counts as a failed dimension
    pub provider_timeout: Duration,
    /// Per-site narration timeout; elapsed calls fall back to template text
    pub narrator_timeout: Duration,
    /// Wall-clock deadline for one run, generation through narration
    pub run_deadline: Duration,
    /// Fan-out bound across candidate sites
    pub max_concurrent_sites: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            weights: DimensionWeights::default(),
            tuning: ScoringTuning::default(),
            revenue: RevenueModel::default(),
            provider_timeout: Duration::from_secs(12),
            narrator_timeout: Duration::from_secs(10),
            run_deadline: Duration::from_secs(60),
            max_concurrent_sites: 4,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> OptimizerResult<()> {
        if (self.weights.sum() - 1.0).abs() > 1e-9 {
            return Err(OptimizerError::Configuration {
                field: format!("weights (sum {}, expected 1.0)", self.weights.sum()),
            });
        }
        for dimension in Dimension::ALL {
            if self.weights.get(dimension) < 0.0 {
                return Err(OptimizerError::Configuration {
                    field: format!("weights.{dimension}"),
                });
            }
        }
        if self.max_concurrent_sites == 0 {
            return Err(OptimizerError::Configuration {
                field: "max_concurrent_sites".to_string(),
            });
        }
        if self.run_deadline.is_zero() || self.provider_timeout.is_zero() {
            return Err(OptimizerError::Configuration {
                field: "timeouts".to_string(),
            });
        }
        Ok(())
    }
}
