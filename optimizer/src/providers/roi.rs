//! ROI dimension: deterministic cost/revenue model

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use shared::{CandidateSite, DataSourceError, Dimension, DimensionScore, OptimizationRequest};

use crate::config::RevenueModel;
use crate::traits::ScoringProvider;

/// Operating cost assumptions applied to the gross revenue estimate
const OPERATING_COST_RATIO: f64 = 0.25;
const FIXED_MONTHLY_COST: f64 = 25_000.0;

/// Scores financial return from the deterministic revenue model: estimated
/// payback period against the requested budget, mapped onto tiered scores
/// (shorter payback is always a higher score).
pub struct RoiProvider {
    revenue: RevenueModel,
}

impl RoiProvider {
    pub fn new(revenue: RevenueModel) -> Self {
        Self { revenue }
    }

    fn payback_score(payback_months: f64) -> f64 {
        if payback_months <= 12.0 {
            10.0
        } else if payback_months <= 18.0 {
            8.5
        } else if payback_months <= 24.0 {
            7.0
        } else if payback_months <= 36.0 {
            5.5
        } else if payback_months <= 48.0 {
            4.0
        } else {
            2.0
        }
    }
}

#[async_trait]
impl ScoringProvider for RoiProvider {
    fn dimension(&self) -> Dimension {
        Dimension::Roi
    }

    async fn evaluate(
        &self,
        site: &CandidateSite,
        request: &OptimizationRequest,
    ) -> Result<DimensionScore, DataSourceError> {
        let monthly_revenue = self.revenue.base_monthly_revenue(request.station_type);
        let operating_cost = monthly_revenue * OPERATING_COST_RATIO + FIXED_MONTHLY_COST;
        let net_monthly_income = monthly_revenue - operating_cost;

        let installation_cost = self
            .revenue
            .installation_cost(request.station_type)
            .min(request.budget as f64);

        let (score, payback_months) = if net_monthly_income > 0.0 {
            let payback = installation_cost / net_monthly_income;
            (Self::payback_score(payback), Some(payback))
        } else {
            // Negative cash flow: worst tier, payback not computable
            (2.0, None)
        };

        debug!(
            site = %site.id,
            station_type = %request.station_type,
            net_monthly_income,
            payback_months = ?payback_months,
            score,
            "roi evaluation settled"
        );

        let mut metrics = BTreeMap::new();
        metrics.insert("monthly_revenue".to_string(), monthly_revenue);
        metrics.insert("net_monthly_income".to_string(), net_monthly_income);
        metrics.insert("installation_cost".to_string(), installation_cost);
        if let Some(payback) = payback_months {
            metrics.insert("payback_months".to_string(), payback);
        }

        Ok(DimensionScore::new(score, metrics))
    }
}
