//! Request and result models for one optimization run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::ValidationError;
use crate::types::{CandidateSite, Coordinates, Dimension, RequestId, RunStage, SiteId, StationType};

/// Request bounds, mirrored in `OptimizationRequest::validate`
pub const MIN_RADIUS_KM: f64 = 1.0;
pub const MAX_RADIUS_KM: f64 = 200.0;
pub const MIN_BUDGET: u64 = 100_000;
pub const MAX_RECOMMENDATIONS_CAP: usize = 50;

/// Target location: either a free-text place name to geocode or explicit
/// coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationQuery {
    Point(Coordinates),
    Name(String),
}

impl LocationQuery {
    pub fn describe(&self) -> String {
        match self {
            LocationQuery::Name(name) => name.clone(),
            LocationQuery::Point(coords) => coords.to_string(),
        }
    }
}

/// Immutable parameters for one optimization run, validated before any
/// scoring begins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub location: LocationQuery,
    pub radius_km: f64,
    pub budget: u64,
    pub station_type: StationType,
    pub max_recommendations: usize,
}

impl OptimizationRequest {
    pub fn new(location: LocationQuery) -> Self {
        Self {
            location,
            radius_km: 50.0,
            budget: 5_000_000,
            station_type: StationType::Fast,
            max_recommendations: 5,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let LocationQuery::Name(name) = &self.location {
            if name.trim().is_empty() {
                return Err(ValidationError::new("location", "must not be empty"));
            }
        }
        if let LocationQuery::Point(coords) = &self.location {
            if !coords.is_valid() {
                return Err(ValidationError::new("location", "coordinates out of range"));
            }
        }
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&self.radius_km) {
            return Err(ValidationError::new(
                "radius_km",
                format!("must be between {MIN_RADIUS_KM} and {MAX_RADIUS_KM}"),
            ));
        }
        if self.budget < MIN_BUDGET {
            return Err(ValidationError::new(
                "budget",
                format!("must be at least {MIN_BUDGET}"),
            ));
        }
        if self.max_recommendations == 0 || self.max_recommendations > MAX_RECOMMENDATIONS_CAP {
            return Err(ValidationError::new(
                "max_recommendations",
                format!("must be between 1 and {MAX_RECOMMENDATIONS_CAP}"),
            ));
        }
        Ok(())
    }
}

/// One provider's score for one (site, dimension) pair.
///
/// The value is clamped into [0, 10] at construction; supporting metrics are
/// named numeric facts the aggregator can lift into insights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub value: f64,
    pub metrics: BTreeMap<String, f64>,
}

impl DimensionScore {
    pub fn new(value: f64, metrics: BTreeMap<String, f64>) -> Self {
        Self {
            value: value.clamp(0.0, 10.0),
            metrics,
        }
    }

    pub fn with_value(value: f64) -> Self {
        Self::new(value, BTreeMap::new())
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

/// Per-dimension score breakdown for one recommendation. A `None` dimension
/// means its provider failed and the overall score was renormalized over the
/// remaining dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub traffic_score: Option<f64>,
    pub grid_capacity: Option<f64>,
    pub competition_gap: Option<f64>,
    pub demographics: Option<f64>,
    pub roi_potential: Option<f64>,
    pub overall_score: f64,
}

impl ScoreBreakdown {
    pub fn dimension(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::Traffic => self.traffic_score,
            Dimension::Grid => self.grid_capacity,
            Dimension::Competition => self.competition_gap,
            Dimension::Demographics => self.demographics,
            Dimension::Roi => self.roi_potential,
        }
    }
}

/// Derived numeric facts attached to a recommendation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteInsights {
    pub daily_traffic: Option<u64>,
    pub estimated_monthly_revenue: Option<u64>,
    /// None means not computable (no positive revenue estimate)
    pub payback_period_months: Option<u32>,
    pub nearest_competitor_km: Option<f64>,
    pub grid_capacity_mw: Option<f64>,
    pub population_density: Option<u64>,
}

/// Location information for a recommendation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    pub coordinates: Coordinates,
    pub address: String,
}

impl LocationInfo {
    pub fn from_site(site: &CandidateSite) -> Self {
        Self {
            name: site.display_name().to_string(),
            coordinates: site.coordinates,
            address: site
                .address
                .clone()
                .unwrap_or_else(|| format!("Near {}", site.display_name())),
        }
    }
}

/// The externally visible unit: one ranked site with its score breakdown,
/// insights and narrative. Read-only after run completion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub location: LocationInfo,
    pub scores: ScoreBreakdown,
    pub insights: SiteInsights,
    pub narrative: String,
    /// Confidence in [0, 1], discounted when dimensions are missing
    pub confidence: f64,
    /// 1-based position in the final ranking
    pub rank: u32,
}

/// One contained failure surfaced in run metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunError {
    pub stage: RunStage,
    pub site_id: SiteId,
    pub dimension: Option<Dimension>,
    pub message: String,
}

impl RunError {
    pub fn evaluation(site_id: SiteId, dimension: Dimension, message: impl Into<String>) -> Self {
        Self {
            stage: RunStage::Evaluation,
            site_id,
            dimension: Some(dimension),
            message: message.into(),
        }
    }

    pub fn narration(site_id: SiteId, message: impl Into<String>) -> Self {
        Self {
            stage: RunStage::Narration,
            site_id,
            dimension: None,
            message: message.into(),
        }
    }
}

/// Run-level metadata for observability of partially degraded runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub processing_time_seconds: f64,
    pub errors: Vec<RunError>,
    pub generated_at: DateTime<Utc>,
    pub candidates_generated: usize,
    pub sites_evaluated: usize,
}

/// Final output of one run: the ranked, capped recommendation list plus
/// metadata. Created once, immutable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub request_id: RequestId,
    pub recommendations: Vec<Recommendation>,
    pub metadata: RunMetadata,
}
