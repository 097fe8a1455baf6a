//! Engine-internal types: raw geo-data shapes and per-site evaluation state

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared::{CandidateSite, Coordinates, Dimension, DimensionScore, ScoreBreakdown, SiteInsights};

/// Road network summary around one candidate site
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadNetwork {
    /// Segment counts keyed by OSM highway class
    pub segments_by_class: BTreeMap<String, u32>,
    pub total_segments: u32,
    pub estimated_length_km: f64,
}

impl RoadNetwork {
    pub fn is_empty(&self) -> bool {
        self.total_segments == 0
    }
}

/// Power infrastructure counts around one candidate site
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerInfrastructure {
    pub substations: u32,
    pub high_voltage_substations: u32,
    pub power_lines: u32,
}

/// An existing charging station near a candidate site
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    pub name: String,
    pub operator: Option<String>,
    pub coordinates: Coordinates,
}

/// A fuel station, counted as a potential conversion site
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelStation {
    pub name: String,
    pub brand: Option<String>,
    pub coordinates: Coordinates,
}

/// Population facts for the area around one candidate site
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationInfo {
    pub population: u64,
    pub density_per_km2: f64,
    pub largest_place: Option<String>,
}

/// Amenity counts used as development and economic-activity proxies
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AmenitySummary {
    pub banks: u32,
    pub healthcare: u32,
    pub education: u32,
    pub retail: u32,
    pub automotive: u32,
    pub industrial: u32,
    pub commercial: u32,
}

impl AmenitySummary {
    /// Development index in [0, 10], weighted towards financial and
    /// healthcare presence.
    pub fn development_index(&self) -> f64 {
        let raw = (self.banks as f64 * 2.0
            + self.healthcare as f64 * 2.0
            + self.education as f64 * 1.5
            + self.retail as f64
            + self.automotive as f64 * 1.5)
            / 10.0;
        raw.min(10.0)
    }

    /// Economic-activity score in [0, 10] from commercial and industrial presence
    pub fn economic_score(&self) -> f64 {
        let raw = (self.commercial as f64 + self.industrial as f64 * 2.0 + self.banks as f64 * 1.5) / 5.0;
        raw.min(10.0)
    }

    /// Industrial load proxy feeding the grid load-factor estimate
    pub fn industrial_load_score(&self) -> f64 {
        let raw = self.industrial as f64 * 2.0 + self.commercial as f64 + self.automotive as f64 * 0.5;
        (raw / 10.0).min(1.0) * 10.0
    }
}

/// Terminal status of one (site, dimension) scoring attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionStatus {
    Success,
    Failed,
    Skipped,
}

/// Settled result of one provider call for one site
#[derive(Clone, Debug, PartialEq)]
pub struct DimensionOutcome {
    pub dimension: Dimension,
    pub status: DimensionStatus,
    pub score: Option<DimensionScore>,
    pub failure: Option<String>,
}

impl DimensionOutcome {
    pub fn success(dimension: Dimension, score: DimensionScore) -> Self {
        Self {
            dimension,
            status: DimensionStatus::Success,
            score: Some(score),
            failure: None,
        }
    }

    pub fn failed(dimension: Dimension, failure: impl Into<String>) -> Self {
        Self {
            dimension,
            status: DimensionStatus::Failed,
            score: None,
            failure: Some(failure.into()),
        }
    }

    pub fn skipped(dimension: Dimension) -> Self {
        Self {
            dimension,
            status: DimensionStatus::Skipped,
            score: None,
            failure: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DimensionStatus::Success
    }
}

/// Settled five-dimension evaluation for one candidate site.
/// Built by the evaluation runner; read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteEvaluation {
    pub site: CandidateSite,
    pub outcomes: Vec<DimensionOutcome>,
}

impl SiteEvaluation {
    pub fn new(site: CandidateSite, outcomes: Vec<DimensionOutcome>) -> Self {
        Self { site, outcomes }
    }

    pub fn outcome(&self, dimension: Dimension) -> Option<&DimensionOutcome> {
        self.outcomes.iter().find(|o| o.dimension == dimension)
    }

    pub fn score(&self, dimension: Dimension) -> Option<&DimensionScore> {
        self.outcome(dimension).and_then(|o| o.score.as_ref())
    }

    /// Supporting metric value from one dimension's score, if that
    /// dimension succeeded
    pub fn metric(&self, dimension: Dimension, name: &str) -> Option<f64> {
        self.score(dimension).and_then(|s| s.metric(name))
    }

    pub fn successful_dimensions(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed_outcomes(&self) -> impl Iterator<Item = &DimensionOutcome> {
        self.outcomes.iter().filter(|o| o.status == DimensionStatus::Failed)
    }
}

/// A site evaluation finalized by the aggregator: score breakdown, insight
/// bundle and recommendation confidence.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredSite {
    pub evaluation: SiteEvaluation,
    pub breakdown: ScoreBreakdown,
    pub insights: SiteInsights,
    /// successful_dimensions / 5
    pub confidence_discount: f64,
    /// Recommendation confidence in [0, 1]
    pub confidence: f64,
}

impl ScoredSite {
    pub fn site(&self) -> &CandidateSite {
        &self.evaluation.site
    }

    pub fn overall_score(&self) -> f64 {
        self.breakdown.overall_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SiteId;

    fn site(id: &str) -> CandidateSite {
        CandidateSite::new(SiteId::new(id), Coordinates::new(13.0, 80.2))
    }

    #[test]
    fn test_successful_dimension_count() {
        let evaluation = SiteEvaluation::new(
            site("site-01"),
            vec![
                DimensionOutcome::success(Dimension::Traffic, DimensionScore::with_value(8.0)),
                DimensionOutcome::failed(Dimension::Grid, "network error"),
                DimensionOutcome::success(Dimension::Competition, DimensionScore::with_value(7.0)),
                DimensionOutcome::skipped(Dimension::Demographics),
                DimensionOutcome::success(Dimension::Roi, DimensionScore::with_value(6.0)),
            ],
        );
        assert_eq!(evaluation.successful_dimensions(), 3);
        assert_eq!(evaluation.failed_outcomes().count(), 1);
        assert!(evaluation.score(Dimension::Grid).is_none());
        assert_eq!(evaluation.score(Dimension::Traffic).unwrap().value, 8.0);
    }

    #[test]
    fn test_metric_lookup_only_on_success() {
        let mut metrics = BTreeMap::new();
        metrics.insert("daily_traffic".to_string(), 35_000.0);
        let evaluation = SiteEvaluation::new(
            site("site-02"),
            vec![
                DimensionOutcome::success(Dimension::Traffic, DimensionScore::new(7.0, metrics)),
                DimensionOutcome::failed(Dimension::Grid, "timeout"),
            ],
        );
        assert_eq!(evaluation.metric(Dimension::Traffic, "daily_traffic"), Some(35_000.0));
        assert_eq!(evaluation.metric(Dimension::Grid, "capacity_mw"), None);
    }

    #[test]
    fn test_development_index_saturates() {
        let amenities = AmenitySummary {
            banks: 50,
            healthcare: 50,
            education: 50,
            retail: 50,
            automotive: 50,
            ..AmenitySummary::default()
        };
        assert_eq!(amenities.development_index(), 10.0);
    }
}
