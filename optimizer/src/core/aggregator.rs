//! Aggregation: weight renormalization, overall score and insight derivation
//!
//! A site is not penalized for a data-source outage unrelated to its actual
//! quality: failed dimensions are removed and the surviving weights are
//! rescaled to sum to 1. A site with few successful dimensions is inherently
//! less trustworthy, so the weighted sum is additionally scaled by the
//! confidence discount (successful dimensions / 5).

use std::collections::BTreeMap;

use shared::{Dimension, ScoreBreakdown, SiteInsights, StationType};

use crate::config::{DimensionWeights, RevenueModel};
use crate::types::{ScoredSite, SiteEvaluation};

/// Total number of evaluation dimensions
pub const DIMENSION_COUNT: usize = Dimension::ALL.len();

/// Renormalize base weights over the given successful dimensions so they
/// sum to 1.0. Empty input yields an empty map.
pub fn renormalized_weights(
    weights: &DimensionWeights,
    successful: &[Dimension],
) -> BTreeMap<Dimension, f64> {
    let total: f64 = successful.iter().map(|d| weights.get(*d)).sum();
    if total <= 0.0 {
        return BTreeMap::new();
    }
    successful
        .iter()
        .map(|d| (*d, weights.get(*d) / total))
        .collect()
}

/// Overall score and confidence discount for one evaluation:
/// `discount x sum(renormalized_weight x score)`, clamped to [0, 10].
/// None when no dimension succeeded; such a site cannot be ranked.
pub fn overall_score(evaluation: &SiteEvaluation, weights: &DimensionWeights) -> Option<(f64, f64)> {
    let successful: Vec<Dimension> = evaluation
        .outcomes
        .iter()
        .filter(|o| o.is_success())
        .map(|o| o.dimension)
        .collect();
    if successful.is_empty() {
        return None;
    }

    let renormalized = renormalized_weights(weights, &successful);
    let weighted: f64 = renormalized
        .iter()
        .filter_map(|(dimension, weight)| {
            evaluation.score(*dimension).map(|s| s.value * weight)
        })
        .sum();

    let discount = successful.len() as f64 / DIMENSION_COUNT as f64;
    Some(((discount * weighted).clamp(0.0, 10.0), discount))
}

/// Derive the insight bundle from dimension metrics.
///
/// The monthly revenue estimate prefers the traffic-driven model; when the
/// traffic dimension failed it falls back to the ROI provider's baseline
/// estimate, and is absent when both are missing. Payback is None rather
/// than a division artifact when no positive revenue estimate exists.
pub fn derive_insights(
    evaluation: &SiteEvaluation,
    station_type: StationType,
    budget: u64,
    revenue: &RevenueModel,
) -> SiteInsights {
    let daily_traffic = evaluation.metric(Dimension::Traffic, "daily_traffic");

    let monthly_revenue = daily_traffic
        .map(|traffic| revenue.monthly_revenue(traffic, station_type))
        .or_else(|| evaluation.metric(Dimension::Roi, "monthly_revenue"))
        .filter(|r| *r > 0.0);

    let payback_period_months = monthly_revenue
        .map(|r| (budget as f64 / r).round())
        .filter(|m| m.is_finite() && *m >= 0.0)
        .map(|m| m as u32);

    SiteInsights {
        daily_traffic: daily_traffic.map(|t| t.round() as u64),
        estimated_monthly_revenue: monthly_revenue.map(|r| r.round() as u64),
        payback_period_months,
        nearest_competitor_km: evaluation.metric(Dimension::Competition, "nearest_competitor_km"),
        grid_capacity_mw: evaluation.metric(Dimension::Grid, "capacity_mw"),
        population_density: evaluation
            .metric(Dimension::Demographics, "population_density")
            .map(|d| d.round() as u64),
    }
}

/// Finalize one evaluation into a scored site. None when no dimension
/// succeeded (the orchestrator drops such sites before ranking).
pub fn finalize(
    evaluation: SiteEvaluation,
    station_type: StationType,
    budget: u64,
    weights: &DimensionWeights,
    revenue: &RevenueModel,
) -> Option<ScoredSite> {
    let (overall, discount) = overall_score(&evaluation, weights)?;
    let insights = derive_insights(&evaluation, station_type, budget, revenue);

    let dimension_value = |d: Dimension| evaluation.score(d).map(|s| s.value);
    let breakdown = ScoreBreakdown {
        traffic_score: dimension_value(Dimension::Traffic),
        grid_capacity: dimension_value(Dimension::Grid),
        competition_gap: dimension_value(Dimension::Competition),
        demographics: dimension_value(Dimension::Demographics),
        roi_potential: dimension_value(Dimension::Roi),
        overall_score: overall,
    };

    // Recommendation confidence: half from data completeness, half from
    // how strong the site actually scored, capped below certainty.
    let confidence = (0.5 * discount + 0.05 * overall).min(0.95);

    Some(ScoredSite {
        evaluation,
        breakdown,
        insights,
        confidence_discount: discount,
        confidence,
    })
}

/// Deterministic narrative used when the LLM narrator fails or times out
pub fn fallback_narrative(site_name: &str, breakdown: &ScoreBreakdown) -> String {
    let overall = breakdown.overall_score;
    if overall >= 8.0 {
        format!(
            "Excellent location near {site_name} with high traffic flow, strong grid \
             infrastructure, limited competition, favorable demographics, and strong ROI \
             potential making it ideal for EV charging station deployment."
        )
    } else if overall >= 6.0 {
        format!(
            "Good location near {site_name} with solid fundamentals across traffic, \
             infrastructure, and market conditions providing a viable opportunity for EV \
             charging station installation."
        )
    } else {
        format!(
            "Moderate location near {site_name} with some challenges but still presenting \
             opportunities for strategic EV charging station placement with proper planning."
        )
    }
}
